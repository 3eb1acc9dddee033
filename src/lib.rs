//! # Shindan - Configurable Assessment Engine
//!
//! **Shindan** runs data-driven quizzes and surveys: a branching sequence of questions
//! whose answers route either to another question or straight to a result bucket, with
//! conditional question visibility, decision-tree or points-based scoring, and optional
//! lead capture before or after the questions.
//!
//! ## Core Workflow
//!
//! The engine is storage-agnostic. It runs on a canonical model of an assessment
//! (config, questions, answers, result buckets) fetched through the `AssessmentService`
//! port. The primary workflow is:
//!
//! 1.  **Provide Your Data**: Implement `AssessmentService` against your data store, or
//!     load an `AssessmentBundle` and serve it with `InMemoryService`. Custom export
//!     formats convert through the `IntoAssessment` trait.
//! 2.  **Load a Run**: `FlowController::load` fetches the assessment by slug and builds
//!     its `QuestionGraph`.
//! 3.  **Drive It**: Feed lead forms and answer selections to the controller. Each call
//!     returns a `Transition` telling you what to show next.
//! 4.  **Navigate**: On `Transition::Complete`, send the user to the result URL.
//!
//! ## Routing
//!
//! After every selection the routing resolver decides the next step. A
//! `resultBucketKey` payload always ends the run. A `nextQuestionId` is followed when
//! the target exists, is visible and is not yet answered; otherwise the run falls
//! through to the next visible question in default order. Malformed payloads and
//! conditions never strand a user.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shindan::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let bundle: AssessmentBundle = serde_json::from_value(json!({
//!         "config": {
//!             "id": "cfg-1", "slug": "readiness", "title": "Readiness check",
//!             "scoringMethod": "decision-tree", "gateBehavior": "UNGATED"
//!         },
//!         "questions": [
//!             { "id": "q1", "order": 1, "questionText": "Do you have a budget?" },
//!             { "id": "q2", "order": 2, "questionText": "When do you start?",
//!               "conditionalLogic": { "questionId": "q1", "answerId": "yes" } }
//!         ],
//!         "answers": [
//!             { "id": "yes", "questionId": "q1", "order": 1, "answerText": "Yes",
//!               "answerValue": { "nextQuestionId": "q2" } },
//!             { "id": "no", "questionId": "q1", "order": 2, "answerText": "No",
//!               "answerValue": { "resultBucketKey": "not-yet" } },
//!             { "id": "now", "questionId": "q2", "order": 1, "answerText": "Now",
//!               "answerValue": "{\"resultBucketKey\":\"ready\"}" }
//!         ]
//!     }))?;
//!
//!     let service = Arc::new(InMemoryService::new().with_bundle(bundle));
//!
//!     tokio_test::block_on(async {
//!         let mut flow = FlowController::load(service, "readiness").await?;
//!         flow.select_answer("yes").await?;
//!         match flow.select_answer("now").await? {
//!             Transition::Complete(done) => {
//!                 println!("-> Result bucket: {:?}", done.bucket_key);
//!                 println!("-> Navigate to: {}", done.result_url);
//!             }
//!             other => println!("-> Unexpected transition: {:?}", other),
//!         }
//!         Ok::<(), Box<dyn std::error::Error>>(())
//!     })
//! }
//! ```

pub mod error;
pub mod flow;
pub mod graph;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod scoring;
pub mod service;
pub mod visibility;

#[cfg(feature = "telemetry")]
pub mod telemetry;
