//! Conditional question visibility.
//!
//! Malformed conditions never hide a question: a `conditionalLogic` payload that is
//! absent or cannot be decoded leaves the question visible.

use crate::graph::QuestionGraph;
use crate::model::{AnswerMap, Condition, Question};

/// Whether `question` should be shown given the answers collected so far.
///
/// A decoded condition `{questionId, answerId}` holds only when that question was
/// answered with exactly that answer id.
pub fn is_visible(question: &Question, answers: &AnswerMap) -> bool {
    let Some(condition) = question.conditional_logic.as_ref().and_then(Condition::decode) else {
        return true;
    };
    answers
        .get(&condition.question_id)
        .is_some_and(|selected| *selected == condition.answer_id)
}

/// Questions in default sequence that are currently visible.
pub fn visible_questions<'a>(
    graph: &'a QuestionGraph,
    answers: &'a AnswerMap,
) -> impl Iterator<Item = &'a Question> + 'a {
    graph
        .sorted_questions()
        .iter()
        .filter(move |q| is_visible(q, answers))
}
