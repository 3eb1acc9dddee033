//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the shindan crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use shindan::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run_example() -> Result<()> {
//! let bundle = AssessmentBundle::from_file("path/to/assessment.json")?;
//! let slug = bundle.config.slug.clone();
//! let service = Arc::new(InMemoryService::new().with_bundle(bundle));
//!
//! let mut flow = FlowController::load(service, &slug).await?;
//! while let Some(question) = flow.current_question() {
//!     let first = flow.graph().answers_for(&question.id)[0].id.clone();
//!     flow.select_answer(&first).await?;
//! }
//! println!("Completion: {:?}", flow.completion());
//! # Ok(())
//! # }
//! ```

// Run control
pub use crate::flow::{Completion, FlowController, LeadForm, Phase, Transition};

// Graph and records
pub use crate::graph::{GraphBuilder, QuestionGraph};
pub use crate::model::{
    Answer, AnswerMap, AnswerPayload, AnswerRoute, AssessmentBundle, AssessmentConfig,
    Condition, EncodedPayload, GateBehavior, IntoAssessment, Question, ResultBucket,
    ScoringMethod,
};

// Routing, visibility and scoring
pub use crate::routing::{Resolution, Route, RouteFormatter, RouteReason, resolve_next};
pub use crate::scoring::{Progress, bucket_for_score};
pub use crate::visibility::{is_visible, visible_questions};

// Service port
pub use crate::service::{
    AnswerSelection, AssessmentService, InMemoryService, LeadCaptureRequest,
    LeadCaptureResponse, SubmitRequest, SubmitResponse,
};

// Error types
pub use crate::error::{
    BundleError, ConversionError, FlowError, GraphError, LeadError, ServiceError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
