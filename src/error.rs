use crate::flow::Phase;
use thiserror::Error;

/// Errors raised while building a runnable question graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Assessment has no questions and cannot be run")]
    NoQuestions,

    #[error("Assessment has no question with answers and cannot be run")]
    NoAnswers,
}

/// Errors returned by the external assessment data service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Resource '{0}' was not found")]
    NotFound(String),

    #[error("Request was rejected: {0}")]
    Rejected(String),

    #[error("Could not reach the assessment service: {0}")]
    Transport(String),
}

/// Validation failures for the lead-capture form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeadError {
    #[error("Please enter your name")]
    MissingName,

    #[error("Please enter a valid email address (got '{0}')")]
    InvalidEmail(String),
}

/// Errors that can occur while driving an assessment run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Assessment '{slug}' is not available")]
    NotAvailable { slug: String },

    #[error(transparent)]
    NotRunnable(#[from] GraphError),

    #[error("Cannot {operation} while the assessment is in the '{phase}' phase")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    #[error("There is no active question")]
    NoActiveQuestion,

    #[error("Answer '{answer_id}' does not belong to question '{question_id}'")]
    UnknownAnswer {
        question_id: String,
        answer_id: String,
    },

    #[error("Question '{0}' has not been visited in this run")]
    NotVisited(String),

    #[error("Already at the first question")]
    NoPreviousQuestion,

    #[error("There is no submission waiting to be sent")]
    NothingToSubmit,

    #[error(transparent)]
    InvalidLead(#[from] LeadError),

    #[error("Submission failed: {0}")]
    Service(#[from] ServiceError),
}

impl FlowError {
    /// Whether the user can retry the same action without changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FlowError::Service(_))
    }
}

/// Errors from reading or writing an assessment bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Could not access bundle file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse bundle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),
}

/// Errors that can occur when converting a custom export format into an `AssessmentBundle`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
