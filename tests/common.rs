//! Common test utilities for building assessments and driving runs.
use serde_json::{Value, json};
use shindan::prelude::*;
use std::sync::Arc;

#[allow(dead_code)]
pub fn question(id: &str, order: i32) -> Question {
    Question {
        id: id.to_string(),
        order,
        question_text: format!("Question {}", id),
        description: None,
        conditional_logic: None,
    }
}

/// A question shown only when `parent` was answered with `answer`.
#[allow(dead_code)]
pub fn conditional(id: &str, order: i32, parent: &str, answer: &str) -> Question {
    Question {
        conditional_logic: Some(EncodedPayload::from_json(&json!({
            "questionId": parent,
            "answerId": answer,
        }))),
        ..question(id, order)
    }
}

#[allow(dead_code)]
pub fn answer(id: &str, question_id: &str, order: i32, value: Value) -> Answer {
    Answer {
        id: id.to_string(),
        question_id: question_id.to_string(),
        order,
        answer_text: format!("Answer {}", id),
        answer_value: EncodedPayload::from_json(&value),
    }
}

#[allow(dead_code)]
pub fn next(question_id: &str) -> Value {
    json!({ "nextQuestionId": question_id })
}

#[allow(dead_code)]
pub fn bucket(key: &str) -> Value {
    json!({ "resultBucketKey": key })
}

#[allow(dead_code)]
pub fn points(value: f64) -> Value {
    json!({ "points": value })
}

#[allow(dead_code)]
pub fn result_bucket(key: &str, order: i32, range: Option<(f64, f64)>) -> ResultBucket {
    ResultBucket {
        bucket_key: key.to_string(),
        bucket_name: key.to_string(),
        title: format!("Result {}", key),
        content: format!("<p>{}</p>", key),
        min_score: range.map(|(min, _)| min),
        max_score: range.map(|(_, max)| max),
        order,
    }
}

#[allow(dead_code)]
pub fn config(slug: &str, scoring: ScoringMethod, gate: GateBehavior) -> AssessmentConfig {
    AssessmentConfig {
        id: format!("cfg-{}", slug),
        slug: slug.to_string(),
        title: format!("Assessment {}", slug),
        description: None,
        entry_question_id: None,
        scoring_method: scoring,
        gate_behavior: gate,
        published: true,
    }
}

/// Q1 (no condition): A1 -> Q2, A2 -> bucket `fast-track`.
/// Q2 (shown when Q1 = A1): B1 -> bucket `standard`.
#[allow(dead_code)]
pub fn fast_track_bundle(gate: GateBehavior) -> AssessmentBundle {
    AssessmentBundle {
        config: config("fast-track", ScoringMethod::DecisionTree, gate),
        questions: vec![question("Q1", 1), conditional("Q2", 2, "Q1", "A1")],
        answers: vec![
            answer("A1", "Q1", 1, next("Q2")),
            answer("A2", "Q1", 2, bucket("fast-track")),
            answer("B1", "Q2", 1, bucket("standard")),
        ],
        buckets: vec![
            result_bucket("fast-track", 1, None),
            result_bucket("standard", 2, None),
        ],
    }
}

/// Q1: A1 -> Q3 explicitly, A2 unrouted. Q2 shown when Q1 = A1. Q3 and Q4 unconditional,
/// every later answer unrouted.
#[allow(dead_code)]
pub fn skip_bundle() -> AssessmentBundle {
    AssessmentBundle {
        config: config("skip", ScoringMethod::DecisionTree, GateBehavior::Ungated),
        questions: vec![
            question("Q1", 1),
            conditional("Q2", 2, "Q1", "A1"),
            question("Q3", 3),
            question("Q4", 4),
        ],
        answers: vec![
            answer("A1", "Q1", 1, next("Q3")),
            answer("A2", "Q1", 2, json!("not json")),
            answer("B1", "Q2", 1, json!({})),
            answer("C1", "Q3", 1, json!({})),
            answer("D1", "Q4", 1, json!({})),
        ],
        buckets: vec![],
    }
}

/// Three points questions; Q3 only appears when Q1 = high.
#[allow(dead_code)]
pub fn points_bundle(gate: GateBehavior) -> AssessmentBundle {
    AssessmentBundle {
        config: config("points", ScoringMethod::Points, gate),
        questions: vec![
            question("Q1", 1),
            question("Q2", 2),
            conditional("Q3", 3, "Q1", "high"),
        ],
        answers: vec![
            answer("low", "Q1", 1, points(1.0)),
            answer("high", "Q1", 2, points(5.0)),
            answer("q2-low", "Q2", 1, points(0.0)),
            answer("q2-high", "Q2", 2, points(5.0)),
            answer("q3-any", "Q3", 1, points(2.0)),
        ],
        buckets: vec![
            result_bucket("beginner", 1, Some((0.0, 5.0))),
            result_bucket("intermediate", 2, Some((5.0, 10.0))),
            result_bucket("expert", 3, Some((10.0, 100.0))),
        ],
    }
}

#[allow(dead_code)]
pub fn graph_of(bundle: &AssessmentBundle) -> QuestionGraph {
    bundle.to_graph().expect("bundle should have questions")
}

/// Builds a service holding `bundle` and loads a run for it.
#[allow(dead_code)]
pub fn start(bundle: AssessmentBundle) -> (Arc<InMemoryService>, FlowController) {
    let slug = bundle.config.slug.clone();
    let service = Arc::new(InMemoryService::new().with_bundle(bundle));
    let flow = tokio_test::block_on(FlowController::load(service.clone(), &slug))
        .expect("assessment should load");
    (service, flow)
}

#[allow(dead_code)]
pub fn valid_lead() -> LeadForm {
    LeadForm::new("Ada Lovelace", "ada@example.com").with_company("Analytical Engines")
}
