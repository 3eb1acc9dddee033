//! Tests for answer routing and conditional visibility.
mod common;
use common::*;
use serde_json::json;
use shindan::prelude::*;

fn answered(pairs: &[(&str, &str)]) -> AnswerMap {
    pairs
        .iter()
        .map(|(q, a)| (q.to_string(), a.to_string()))
        .collect()
}

#[test]
fn test_visibility_rules() {
    let always = question("Q1", 1);
    let gated = conditional("Q2", 2, "Q1", "A1");
    let mut malformed = question("Q3", 3);
    malformed.conditional_logic = Some(EncodedPayload::new("{questionId: Q1"));
    let mut half = question("Q4", 4);
    half.conditional_logic = Some(EncodedPayload::from_json(&json!({ "questionId": "Q1" })));

    let none = AnswerMap::new();
    assert!(is_visible(&always, &none));
    assert!(!is_visible(&gated, &none));
    assert!(is_visible(&gated, &answered(&[("Q1", "A1")])));
    assert!(!is_visible(&gated, &answered(&[("Q1", "A2")])));
    assert!(is_visible(&malformed, &none));
    assert!(is_visible(&half, &none));
}

#[test]
fn test_visibility_compares_answer_ids_not_text() {
    let gated = conditional("Q2", 2, "Q1", "Answer A1");
    assert!(!is_visible(&gated, &answered(&[("Q1", "A1")])));
}

#[test]
fn test_bucket_payload_terminates_immediately() {
    let bundle = fast_track_bundle(GateBehavior::Ungated);
    let graph = graph_of(&bundle);

    let resolution = resolve_next("Q1", "A2", &answered(&[("Q1", "A2")]), &graph);
    assert_eq!(resolution.route, Route::Bucket("fast-track".to_string()));
    assert_eq!(resolution.reason, RouteReason::ResultBucket);
    assert!(!resolution.reason.is_fallback());
}

#[test]
fn test_bucket_wins_over_next_question_in_same_payload() {
    let graph = QuestionGraph::builder(
        vec![question("Q1", 1), question("Q2", 2)],
        vec![answer(
            "A1",
            "Q1",
            1,
            json!({ "nextQuestionId": "Q2", "resultBucketKey": "done" }),
        )],
    )
    .build()
    .unwrap();

    let resolution = resolve_next("Q1", "A1", &answered(&[("Q1", "A1")]), &graph);
    assert_eq!(resolution.route, Route::Bucket("done".to_string()));
}

#[test]
fn test_explicit_edge_followed_when_visible() {
    let graph = graph_of(&fast_track_bundle(GateBehavior::Ungated));

    let resolution = resolve_next("Q1", "A1", &answered(&[("Q1", "A1")]), &graph);
    assert_eq!(resolution.route, Route::Question("Q2".to_string()));
    assert_eq!(resolution.reason, RouteReason::ExplicitEdge);
}

#[test]
fn test_explicit_edge_beats_condition_adjacency() {
    let graph = graph_of(&skip_bundle());

    // Q2 is unlocked by Q1 = A1, but A1 routes to Q3
    let resolution = resolve_next("Q1", "A1", &answered(&[("Q1", "A1")]), &graph);
    assert_eq!(resolution.route, Route::Question("Q3".to_string()));
}

#[test]
fn test_hidden_target_falls_back_to_visible_question() {
    let graph = QuestionGraph::builder(
        vec![
            question("Q1", 1),
            conditional("Q2", 2, "Q1", "other"),
            conditional("Q3", 3, "Q1", "other"),
            question("Q4", 4),
        ],
        vec![
            answer("A1", "Q1", 1, next("Q3")),
            answer("D1", "Q4", 1, json!({})),
        ],
    )
    .build()
    .unwrap();

    let resolution = resolve_next("Q1", "A1", &answered(&[("Q1", "A1")]), &graph);
    assert_eq!(resolution.route, Route::Question("Q4".to_string()));
    assert_eq!(resolution.reason, RouteReason::HiddenTarget("Q3".to_string()));
}

#[test]
fn test_dangling_target_falls_back_to_sequence() {
    let graph = QuestionGraph::builder(
        vec![question("Q1", 1), question("Q2", 2)],
        vec![
            answer("A1", "Q1", 1, next("Q404")),
            answer("B1", "Q2", 1, json!({})),
        ],
    )
    .build()
    .unwrap();

    let resolution = resolve_next("Q1", "A1", &answered(&[("Q1", "A1")]), &graph);
    assert_eq!(resolution.route, Route::Question("Q2".to_string()));
    assert_eq!(
        resolution.reason,
        RouteReason::MissingTarget("Q404".to_string())
    );
}

#[test]
fn test_non_json_payload_falls_back_to_sequence() {
    let graph = graph_of(&skip_bundle());

    // A2 is "not json"; Q2 is hidden because Q1 != A1, so Q3 is next
    let resolution = resolve_next("Q1", "A2", &answered(&[("Q1", "A2")]), &graph);
    assert_eq!(resolution.route, Route::Question("Q3".to_string()));
    assert_eq!(resolution.reason, RouteReason::NoRouting);
}

#[test]
fn test_exhausted_sequence_ends_run() {
    let graph = graph_of(&skip_bundle());

    let answers = answered(&[("Q1", "A1"), ("Q3", "C1"), ("Q4", "D1")]);
    let resolution = resolve_next("Q4", "D1", &answers, &graph);
    assert_eq!(resolution.route, Route::End);
}

#[test]
fn test_edge_to_answered_question_is_not_revisited() {
    let graph = QuestionGraph::builder(
        vec![question("Q1", 1), question("Q2", 2), question("Q3", 3)],
        vec![
            answer("A1", "Q1", 1, next("Q2")),
            answer("B1", "Q2", 1, next("Q1")),
            answer("self", "Q3", 1, next("Q3")),
        ],
    )
    .build()
    .unwrap();

    let answers = answered(&[("Q1", "A1"), ("Q2", "B1")]);
    let resolution = resolve_next("Q2", "B1", &answers, &graph);
    assert_eq!(resolution.route, Route::Question("Q3".to_string()));
    assert_eq!(
        resolution.reason,
        RouteReason::RevisitedTarget("Q1".to_string())
    );

    let answers = answered(&[("Q1", "A1"), ("Q2", "B1"), ("Q3", "self")]);
    let resolution = resolve_next("Q3", "self", &answers, &graph);
    assert_eq!(resolution.route, Route::End);
}

#[test]
fn test_questions_without_answers_are_never_routed_to() {
    let graph = QuestionGraph::builder(
        vec![question("Q1", 1), question("Q2", 2), question("Q3", 3)],
        vec![
            answer("A1", "Q1", 1, json!({})),
            answer("A2", "Q1", 2, next("Q2")),
            answer("C1", "Q3", 1, bucket("done")),
        ],
    )
    .build()
    .unwrap();

    let resolution = resolve_next("Q1", "A1", &answered(&[("Q1", "A1")]), &graph);
    assert_eq!(resolution.route, Route::Question("Q3".to_string()));
    assert_eq!(resolution.reason, RouteReason::NoRouting);

    let resolution = resolve_next("Q1", "A2", &answered(&[("Q1", "A2")]), &graph);
    assert_eq!(resolution.route, Route::Question("Q3".to_string()));
    assert_eq!(resolution.reason, RouteReason::EmptyTarget("Q2".to_string()));
    assert!(resolution.reason.is_fallback());
    assert_eq!(
        RouteFormatter::explain(&resolution),
        "edge to 'Q2' has no answers; continuing with 'Q3'"
    );
}

#[test]
fn test_unknown_answer_falls_back_to_sequence() {
    let graph = graph_of(&skip_bundle());
    let resolution = resolve_next("Q3", "nope", &answered(&[("Q3", "nope")]), &graph);
    assert_eq!(resolution.route, Route::Question("Q4".to_string()));
    assert_eq!(
        resolution.reason,
        RouteReason::UnknownAnswer("nope".to_string())
    );
}

#[test]
fn test_route_formatter_explanations() {
    let resolution = Resolution {
        from_question: "Q1".to_string(),
        route: Route::Question("Q3".to_string()),
        reason: RouteReason::HiddenTarget("Q9".to_string()),
    };
    assert_eq!(
        RouteFormatter::explain(&resolution),
        "edge to 'Q9' is hidden; continuing with 'Q3'"
    );

    let terminal = Resolution {
        from_question: "Q1".to_string(),
        route: Route::Bucket("fast-track".to_string()),
        reason: RouteReason::ResultBucket,
    };
    assert_eq!(
        RouteFormatter::explain(&terminal),
        "result bucket 'fast-track'"
    );

    let done = Resolution {
        from_question: "Q4".to_string(),
        route: Route::End,
        reason: RouteReason::NoRouting,
    };
    assert_eq!(
        RouteFormatter::explain(&done),
        "no routing; no questions remain"
    );
}

#[test]
fn test_payload_decoding_is_tolerant() {
    let decode = |raw: &str| AnswerPayload::decode(&EncodedPayload::new(raw));

    assert_eq!(decode("not json").route, AnswerRoute::Unrouted);
    assert_eq!(decode("\"Q2\"").route, AnswerRoute::Unrouted);
    assert_eq!(decode("").route, AnswerRoute::Unrouted);
    assert_eq!(
        decode(r#"{"nextQuestionId": ""}"#).route,
        AnswerRoute::Unrouted
    );
    assert_eq!(
        decode(r#"{"nextQuestionId": " Q2 "}"#).route,
        AnswerRoute::NextQuestion(" Q2 ".to_string())
    );
    assert_eq!(
        decode(r#"{"nextQuestionId": 7}"#).route,
        AnswerRoute::Unrouted
    );

    let weighted = decode(r#"{"nextQuestionId": "Q2", "points": 2.5}"#);
    assert_eq!(weighted.route, AnswerRoute::NextQuestion("Q2".to_string()));
    assert_eq!(weighted.points, Some(2.5));
}
