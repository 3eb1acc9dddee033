use super::{
    AssessmentService, LeadCaptureRequest, LeadCaptureResponse, SubmitRequest, SubmitResponse,
};
use crate::error::ServiceError;
use crate::model::{
    Answer, AnswerPayload, AssessmentBundle, AssessmentConfig, GateBehavior, Question,
    ResultBucket, ScoringMethod,
};
use crate::scoring::bucket_for_score;
use ahash::AHashMap;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// A submitted run as recorded by the in-memory service.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub session_id: String,
    pub slug: String,
    pub request: SubmitRequest,
    pub bucket_key: Option<String>,
    pub score: Option<f64>,
    pub lead: Option<LeadCaptureRequest>,
}

#[derive(Default)]
struct MemoryState {
    bundles: AHashMap<String, AssessmentBundle>,
    sessions: Vec<SessionRecord>,
    failures_remaining: usize,
}

/// Reference `AssessmentService` that serves bundles from memory.
///
/// Session ids are `session-<n>`, result URLs are `/assessments/<slug>/results/<session>`.
/// Points assessments are scored by summing each selected answer's `points` and mapping
/// the total through `bucket_for_score`.
#[derive(Default)]
pub struct InMemoryService {
    state: Mutex<MemoryState>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(mut self, bundle: AssessmentBundle) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .bundles
            .insert(bundle.config.slug.clone(), bundle);
        self
    }

    /// Makes the next `count` calls fail with a transport error.
    pub fn fail_next(&self, count: usize) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .failures_remaining = count;
    }

    /// All sessions submitted so far, oldest first.
    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sessions
            .clone()
    }

    pub fn session(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions()
            .into_iter()
            .find(|s| s.session_id == session_id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ServiceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ServiceError::Transport("service state lock poisoned".to_string()))?;
        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(ServiceError::Transport("simulated network failure".to_string()));
        }
        Ok(state)
    }
}

impl MemoryState {
    fn bundle_by_id(&self, config_id: &str) -> Result<&AssessmentBundle, ServiceError> {
        self.bundles
            .values()
            .find(|b| b.config.id == config_id)
            .ok_or_else(|| ServiceError::NotFound(config_id.to_string()))
    }
}

fn result_url(slug: &str, session_id: &str) -> String {
    format!("/assessments/{}/results/{}", slug, session_id)
}

#[async_trait]
impl AssessmentService for InMemoryService {
    async fn fetch_config(&self, slug: &str) -> Result<AssessmentConfig, ServiceError> {
        self.lock()?
            .bundles
            .get(slug)
            .map(|b| b.config.clone())
            .ok_or_else(|| ServiceError::NotFound(slug.to_string()))
    }

    async fn fetch_questions(&self, config_id: &str) -> Result<Vec<Question>, ServiceError> {
        Ok(self.lock()?.bundle_by_id(config_id)?.questions.clone())
    }

    async fn fetch_answers(&self, config_id: &str) -> Result<Vec<Answer>, ServiceError> {
        Ok(self.lock()?.bundle_by_id(config_id)?.answers.clone())
    }

    async fn fetch_buckets(&self, config_id: &str) -> Result<Vec<ResultBucket>, ServiceError> {
        Ok(self.lock()?.bundle_by_id(config_id)?.buckets.clone())
    }

    async fn submit(
        &self,
        config_id: &str,
        request: SubmitRequest,
    ) -> Result<SubmitResponse, ServiceError> {
        let mut state = self.lock()?;
        let bundle = state.bundle_by_id(config_id)?;

        let mut score = 0.0;
        for selection in &request.answers {
            let answer = bundle
                .answers
                .iter()
                .find(|a| a.id == selection.answer_id && a.question_id == selection.question_id)
                .ok_or_else(|| {
                    ServiceError::Rejected(format!(
                        "answer '{}' does not belong to question '{}'",
                        selection.answer_id, selection.question_id
                    ))
                })?;
            score += AnswerPayload::decode(&answer.answer_value)
                .points
                .unwrap_or(0.0);
        }

        let (bucket_key, score) = match bundle.config.scoring_method {
            ScoringMethod::DecisionTree => (request.result_bucket_key.clone(), None),
            ScoringMethod::Points => (
                bucket_for_score(&bundle.buckets, score).map(|b| b.bucket_key.clone()),
                Some(score),
            ),
        };

        let slug = bundle.config.slug.clone();
        let gated = bundle.config.gate_behavior == GateBehavior::PostGated;
        let session_id = format!("session-{}", state.sessions.len() + 1);
        info!(%session_id, %slug, answers = request.answers.len(), "recorded submission");

        state.sessions.push(SessionRecord {
            session_id: session_id.clone(),
            slug: slug.clone(),
            request,
            bucket_key,
            score,
            lead: None,
        });

        Ok(SubmitResponse {
            result_url: (!gated).then(|| result_url(&slug, &session_id)),
            session_id,
        })
    }

    async fn capture_lead(
        &self,
        session_id: &str,
        request: LeadCaptureRequest,
    ) -> Result<LeadCaptureResponse, ServiceError> {
        let mut state = self.lock()?;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.session_id == session_id)
            .ok_or_else(|| ServiceError::NotFound(session_id.to_string()))?;
        session.lead = Some(request);
        Ok(LeadCaptureResponse {
            result_url: result_url(&session.slug, session_id),
        })
    }
}
