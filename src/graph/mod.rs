use crate::model::{Answer, Question, ResultBucket};
use ahash::AHashMap;

mod builder;

pub use builder::GraphBuilder;

/// Read-only projection over the questions, answers and result buckets of one assessment.
///
/// A graph always holds at least one question; `GraphBuilder::build` refuses to produce
/// an empty one.
#[derive(Debug, Clone)]
pub struct QuestionGraph {
    /// Sorted by `order`, ties broken by id.
    questions: Vec<Question>,
    positions: AHashMap<String, usize>,
    /// Answers per question id, sorted by `order`.
    answers: AHashMap<String, Vec<Answer>>,
    answer_owners: AHashMap<String, String>,
    /// Sorted by `order`, ties broken by key.
    buckets: Vec<ResultBucket>,
    entry: usize,
}

impl QuestionGraph {
    pub fn builder(questions: Vec<Question>, answers: Vec<Answer>) -> GraphBuilder {
        GraphBuilder::new(questions, answers)
    }

    /// All questions in their default sequence.
    pub fn sorted_questions(&self) -> &[Question] {
        &self.questions
    }

    /// Answers for a question in display order. Unknown questions have none.
    pub fn answers_for(&self, question_id: &str) -> &[Answer] {
        self.answers
            .get(question_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.position(id).map(|pos| &self.questions[pos])
    }

    pub fn answer(&self, id: &str) -> Option<&Answer> {
        let owner = self.answer_owners.get(id)?;
        self.answers_for(owner).iter().find(|a| a.id == id)
    }

    /// Index of a question within `sorted_questions()`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// The question a run starts with.
    pub fn entry_question(&self) -> &Question {
        &self.questions[self.entry]
    }

    pub fn buckets(&self) -> &[ResultBucket] {
        &self.buckets
    }

    pub fn bucket(&self, key: &str) -> Option<&ResultBucket> {
        self.buckets.iter().find(|b| b.bucket_key == key)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
