use super::QuestionGraph;
use crate::error::GraphError;
use crate::model::{Answer, AnswerMap, Question, ResultBucket};
use crate::visibility::is_visible;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use tracing::warn;

/// Collects the fetched records of one assessment and indexes them into a `QuestionGraph`.
pub struct GraphBuilder {
    questions: Vec<Question>,
    answers: Vec<Answer>,
    buckets: Vec<ResultBucket>,
    entry_question_id: Option<String>,
}

impl GraphBuilder {
    pub fn new(questions: Vec<Question>, answers: Vec<Answer>) -> Self {
        Self {
            questions,
            answers,
            buckets: Vec::new(),
            entry_question_id: None,
        }
    }

    pub fn with_buckets(mut self, buckets: Vec<ResultBucket>) -> Self {
        self.buckets = buckets;
        self
    }

    /// Sets an explicit entry question. A dangling id falls back to the first sorted question.
    pub fn with_entry_question(mut self, question_id: &str) -> Self {
        self.entry_question_id = Some(question_id.to_string());
        self
    }

    pub fn build(self) -> Result<QuestionGraph, GraphError> {
        if self.questions.is_empty() {
            return Err(GraphError::NoQuestions);
        }

        let questions: Vec<Question> = self
            .questions
            .into_iter()
            .sorted_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)))
            .unique_by(|q| q.id.clone())
            .collect();

        let positions: AHashMap<String, usize> = questions
            .iter()
            .enumerate()
            .map(|(pos, q)| (q.id.clone(), pos))
            .collect();

        let mut seen_answers = AHashSet::new();
        let mut answers: AHashMap<String, Vec<Answer>> = AHashMap::new();
        for answer in self.answers {
            if !positions.contains_key(&answer.question_id) {
                warn!(
                    answer_id = %answer.id,
                    question_id = %answer.question_id,
                    "dropping answer attached to an unknown question"
                );
                continue;
            }
            if !seen_answers.insert(answer.id.clone()) {
                warn!(answer_id = %answer.id, "dropping duplicate answer id");
                continue;
            }
            answers
                .entry(answer.question_id.clone())
                .or_default()
                .push(answer);
        }
        for list in answers.values_mut() {
            list.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        }

        let answer_owners = answers
            .iter()
            .flat_map(|(question_id, list)| {
                list.iter().map(|a| (a.id.clone(), question_id.clone()))
            })
            .collect();

        let buckets = self
            .buckets
            .into_iter()
            .sorted_by(|a, b| {
                a.order
                    .cmp(&b.order)
                    .then_with(|| a.bucket_key.cmp(&b.bucket_key))
            })
            .collect();

        let entry = match self.entry_question_id {
            Some(id) => positions.get(&id).copied().unwrap_or_else(|| {
                warn!(entry_question_id = %id, "entry question not found, starting at the first question");
                0
            }),
            None => 0,
        };
        let entry = answerable_entry(entry, &questions, &answers);

        Ok(QuestionGraph {
            questions,
            positions,
            answers,
            answer_owners,
            buckets,
            entry,
        })
    }
}

/// Moves an entry question without answers to the first answerable question after it
/// that is shown on a fresh run, or failing that to any answerable question.
fn answerable_entry(
    entry: usize,
    questions: &[Question],
    answers: &AHashMap<String, Vec<Answer>>,
) -> usize {
    let answerable = |pos: &usize| {
        answers
            .get(&questions[*pos].id)
            .is_some_and(|list| !list.is_empty())
    };
    if answerable(&entry) {
        return entry;
    }
    let fresh = AnswerMap::new();
    let replacement = (entry + 1..questions.len())
        .find(|pos| answerable(pos) && is_visible(&questions[*pos], &fresh))
        .or_else(|| (0..questions.len()).find(answerable));
    match replacement {
        Some(pos) => {
            warn!(
                entry_question_id = %questions[entry].id,
                replacement = %questions[pos].id,
                "entry question has no answers, starting at the next answerable question"
            );
            pos
        }
        None => entry,
    }
}
