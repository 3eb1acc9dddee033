use crate::graph::QuestionGraph;
use crate::model::{AnswerMap, ResultBucket, ScoringMethod};
use crate::visibility::visible_questions;
use itertools::Itertools;

/// Position of a run within its assessment, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.current.min(self.total) * 100) / self.total) as u8
    }
}

impl ScoringMethod {
    /// Denominator for progress display.
    ///
    /// Decision-tree runs count every question, since branch-skipped questions are
    /// unknown in advance. Points runs count the questions visible for the answers so far.
    pub fn total_questions(&self, graph: &QuestionGraph, answers: &AnswerMap) -> usize {
        match self {
            ScoringMethod::DecisionTree => graph.len(),
            ScoringMethod::Points => visible_questions(graph, answers).count(),
        }
    }

    /// Whether the submission endpoint assigns the result bucket.
    pub fn delegates_bucket(&self) -> bool {
        matches!(self, ScoringMethod::Points)
    }

    /// The bucket this run is known to end in, given the bucket key reached by routing.
    pub fn assigned_bucket(&self, routed: Option<String>) -> Option<String> {
        if self.delegates_bucket() { None } else { routed }
    }
}

/// First bucket in `order` whose inclusive score range contains `score`.
pub fn bucket_for_score(buckets: &[ResultBucket], score: f64) -> Option<&ResultBucket> {
    buckets
        .iter()
        .sorted_by_key(|b| b.order)
        .find(|b| b.contains_score(score))
}
