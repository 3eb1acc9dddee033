use crate::graph::QuestionGraph;
use crate::model::{AnswerMap, AnswerPayload, AnswerRoute};
use crate::visibility::is_visible;
use tracing::{debug, warn};

mod formatter;

pub use formatter::RouteFormatter;

/// Where the flow goes after an answer is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Show this question next.
    Question(String),
    /// Terminate in this result bucket.
    Bucket(String),
    /// No visible question remains; the run is complete.
    End,
}

/// Why the resolver picked its route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteReason {
    /// The answer names a result bucket.
    ResultBucket,
    /// The answer names a visible, unanswered question.
    ExplicitEdge,
    /// The answer names a question that does not exist.
    MissingTarget(String),
    /// The answer names a question whose condition is not met.
    HiddenTarget(String),
    /// The answer names a question already answered in this run.
    RevisitedTarget(String),
    /// The answer names a question that has no answers to select.
    EmptyTarget(String),
    /// The answer payload carries no routing.
    NoRouting,
    /// The selected answer id is not part of the graph.
    UnknownAnswer(String),
}

impl RouteReason {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, RouteReason::ResultBucket | RouteReason::ExplicitEdge)
    }
}

/// The outcome of resolving one answer selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub from_question: String,
    pub route: Route,
    pub reason: RouteReason,
}

/// Decides the next step after `selected_answer_id` was chosen on `current_question_id`.
///
/// `answers` must already contain the new selection. In priority order:
/// 1. a `resultBucketKey` payload terminates the run,
/// 2. a `nextQuestionId` that exists, is visible, has answers and is not yet answered
///    is followed,
/// 3. otherwise the next visible, unanswered question with answers after the current
///    one in default sequence is taken,
/// 4. if there is none, the run ends.
///
/// Every question step lands on an unanswered question, so a run ends after at most
/// `graph.len()` selections even when authored edges form a cycle.
pub fn resolve_next(
    current_question_id: &str,
    selected_answer_id: &str,
    answers: &AnswerMap,
    graph: &QuestionGraph,
) -> Resolution {
    let reason = match graph.answer(selected_answer_id) {
        None => RouteReason::UnknownAnswer(selected_answer_id.to_string()),
        Some(answer) => match AnswerPayload::decode(&answer.answer_value).route {
            AnswerRoute::ResultBucket(key) => {
                return finish(current_question_id, Route::Bucket(key), RouteReason::ResultBucket);
            }
            AnswerRoute::NextQuestion(target) => match graph.question(&target) {
                None => {
                    warn!(
                        answer_id = %selected_answer_id,
                        target = %target,
                        "answer routes to a question that does not exist"
                    );
                    RouteReason::MissingTarget(target)
                }
                Some(_) if answers.contains_key(&target) => RouteReason::RevisitedTarget(target),
                Some(question) if !is_visible(question, answers) => RouteReason::HiddenTarget(target),
                Some(_) if graph.answers_for(&target).is_empty() => {
                    warn!(target = %target, "answer routes to a question without answers");
                    RouteReason::EmptyTarget(target)
                }
                Some(_) => {
                    return finish(
                        current_question_id,
                        Route::Question(target),
                        RouteReason::ExplicitEdge,
                    );
                }
            },
            AnswerRoute::Unrouted => RouteReason::NoRouting,
        },
    };

    let route = scan_forward(current_question_id, answers, graph);
    finish(current_question_id, route, reason)
}

/// First visible, unanswered question with answers after `current_question_id` in
/// default sequence.
fn scan_forward(current_question_id: &str, answers: &AnswerMap, graph: &QuestionGraph) -> Route {
    let start = graph.position(current_question_id).map_or(0, |pos| pos + 1);
    graph.sorted_questions()[start..]
        .iter()
        .find(|q| {
            !answers.contains_key(&q.id)
                && !graph.answers_for(&q.id).is_empty()
                && is_visible(q, answers)
        })
        .map_or(Route::End, |q| Route::Question(q.id.clone()))
}

fn finish(from_question: &str, route: Route, reason: RouteReason) -> Resolution {
    let resolution = Resolution {
        from_question: from_question.to_string(),
        route,
        reason,
    };
    debug!(
        from = %resolution.from_question,
        "{}",
        RouteFormatter::explain(&resolution)
    );
    resolution
}
