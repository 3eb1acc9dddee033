use super::payload::EncodedPayload;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selected answers for one run: question id -> answer id.
pub type AnswerMap = AHashMap<String, String>;

/// How progress and result buckets are determined for an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScoringMethod {
    /// Termination and bucket come from answer routing edges.
    #[default]
    #[serde(rename = "decision-tree", alias = "DECISION_TREE", alias = "decision_tree")]
    DecisionTree,
    /// Answers carry points; the submission endpoint maps the total into a bucket.
    #[serde(rename = "points", alias = "POINTS")]
    Points,
}

/// Where lead capture happens relative to the question loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateBehavior {
    #[default]
    Ungated,
    PreGated,
    PostGated,
}

impl fmt::Display for GateBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateBehavior::Ungated => write!(f, "UNGATED"),
            GateBehavior::PreGated => write!(f, "PRE_GATED"),
            GateBehavior::PostGated => write!(f, "POST_GATED"),
        }
    }
}

fn published_by_default() -> bool {
    true
}

/// Top-level settings of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentConfig {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Explicit first question. Defaults to the lowest-ordered question.
    #[serde(default)]
    pub entry_question_id: Option<String>,
    #[serde(default)]
    pub scoring_method: ScoringMethod,
    #[serde(default)]
    pub gate_behavior: GateBehavior,
    #[serde(default = "published_by_default")]
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub order: i32,
    pub question_text: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Encoded `{questionId, answerId}` visibility predicate.
    #[serde(default)]
    pub conditional_logic: Option<EncodedPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub question_id: String,
    pub order: i32,
    pub answer_text: String,
    /// Encoded routing payload: `{nextQuestionId}`, `{resultBucketKey}` or anything else.
    #[serde(default)]
    pub answer_value: EncodedPayload,
}

/// A keyed terminal outcome of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBucket {
    pub bucket_key: String,
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub order: i32,
}

impl ResultBucket {
    /// Inclusive range check. A missing bound is unbounded on that side.
    pub fn contains_score(&self, score: f64) -> bool {
        self.min_score.is_none_or(|min| score >= min)
            && self.max_score.is_none_or(|max| score <= max)
    }
}
