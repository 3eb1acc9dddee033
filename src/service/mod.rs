//! Assessment data service port.
//!
//! The engine never talks to storage directly. Configs, questions, answers and buckets
//! are fetched through this trait, and finished runs are submitted through it.
//!
//! # Design
//!
//! - **Request/response only**: every call is a single round trip
//! - **No retries**: failures are surfaced to the caller, who decides whether to retry

use crate::error::ServiceError;
use crate::model::{Answer, AssessmentConfig, Question, ResultBucket};
use async_trait::async_trait;

mod memory;
mod wire;

pub use memory::InMemoryService;
pub use wire::*;

/// Port to the external assessment data service.
#[async_trait]
pub trait AssessmentService: Send + Sync {
    /// Fetch an assessment config by its public slug.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no assessment has this slug
    async fn fetch_config(&self, slug: &str) -> Result<AssessmentConfig, ServiceError>;

    /// Fetch all questions of an assessment.
    async fn fetch_questions(&self, config_id: &str) -> Result<Vec<Question>, ServiceError>;

    /// Fetch all answers of an assessment, across every question.
    async fn fetch_answers(&self, config_id: &str) -> Result<Vec<Answer>, ServiceError>;

    /// Fetch the result buckets of an assessment.
    async fn fetch_buckets(&self, config_id: &str) -> Result<Vec<ResultBucket>, ServiceError>;

    /// Submit a finished run.
    ///
    /// The response carries a `resultUrl` unless the assessment is POST_GATED, in which
    /// case the URL is only handed out by `capture_lead`.
    async fn submit(
        &self,
        config_id: &str,
        request: SubmitRequest,
    ) -> Result<SubmitResponse, ServiceError>;

    /// Attach lead details to a submitted session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    async fn capture_lead(
        &self,
        session_id: &str,
        request: LeadCaptureRequest,
    ) -> Result<LeadCaptureResponse, ServiceError>;
}
