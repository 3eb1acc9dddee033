//! The assessment run state machine.
//!
//! A `FlowController` owns everything that changes during one run: the phase, the
//! active question, the visited path and the answer map. It consults the routing
//! resolver after each selection and talks to the `AssessmentService` when the run
//! is submitted or a post-gate lead is captured.
//!
//! All mutating operations take `&mut self`, so no two submissions for the same run
//! can be in flight at once.

use crate::error::{FlowError, GraphError, ServiceError};
use crate::graph::QuestionGraph;
use crate::model::{AnswerMap, AssessmentConfig, GateBehavior, Question, ResultBucket};
use crate::routing::{Resolution, Route, resolve_next};
use crate::scoring::Progress;
use crate::service::{AnswerSelection, AssessmentService, SubmitRequest};
use std::sync::Arc;
use tracing::{info, warn};

mod lead;
mod phase;

pub use lead::{LeadForm, is_valid_email};
pub use phase::Phase;

/// The final outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub session_id: String,
    pub result_url: String,
    /// Bucket reached through a decision-tree routing edge. `None` when bucket
    /// assignment is delegated to the submission endpoint.
    pub bucket_key: Option<String>,
}

/// What the caller should show after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Show this question.
    Question(String),
    /// The run was submitted; show the post-gate lead form.
    LeadCapture { session_id: String },
    /// Navigate to the result.
    Complete(Completion),
}

#[derive(Debug, Clone)]
struct PendingSubmission {
    routed_bucket: Option<String>,
}

#[derive(Debug, Clone)]
struct AwaitingLead {
    session_id: String,
    bucket_key: Option<String>,
}

pub struct FlowController {
    service: Arc<dyn AssessmentService>,
    config: AssessmentConfig,
    graph: QuestionGraph,
    phase: Phase,
    current: Option<String>,
    /// Answered questions of the active path, in the order they were answered.
    path: Vec<String>,
    answers: AnswerMap,
    lead: Option<LeadForm>,
    pending: Option<PendingSubmission>,
    awaiting_lead: Option<AwaitingLead>,
    completion: Option<Completion>,
    last_resolution: Option<Resolution>,
    last_error: Option<String>,
}

impl FlowController {
    /// Fetches an assessment by slug and prepares a run.
    ///
    /// # Errors
    ///
    /// - `NotAvailable` if the slug is unknown or the assessment is unpublished
    /// - `NotRunnable` if the assessment has no questions, or none of them has answers
    /// - `Service` if any fetch fails
    pub async fn load(service: Arc<dyn AssessmentService>, slug: &str) -> Result<Self, FlowError> {
        let config = match service.fetch_config(slug).await {
            Ok(config) if config.published => config,
            Ok(_) | Err(ServiceError::NotFound(_)) => {
                return Err(FlowError::NotAvailable {
                    slug: slug.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let questions = service.fetch_questions(&config.id).await?;
        let answers = service.fetch_answers(&config.id).await?;
        let buckets = service.fetch_buckets(&config.id).await?;

        let mut builder = QuestionGraph::builder(questions, answers).with_buckets(buckets);
        if let Some(entry) = &config.entry_question_id {
            builder = builder.with_entry_question(entry);
        }
        let graph = builder.build()?;
        if graph.answers_for(&graph.entry_question().id).is_empty() {
            return Err(GraphError::NoAnswers.into());
        }

        Ok(Self::new(service, config, graph))
    }

    /// Prepares a run over already-fetched data.
    pub fn new(
        service: Arc<dyn AssessmentService>,
        config: AssessmentConfig,
        graph: QuestionGraph,
    ) -> Self {
        let phase = Phase::initial(config.gate_behavior);
        let current = (phase == Phase::Questions).then(|| graph.entry_question().id.clone());
        info!(
            slug = %config.slug,
            gate = %config.gate_behavior,
            %phase,
            "assessment run started"
        );
        Self {
            service,
            config,
            graph,
            phase,
            current,
            path: Vec::new(),
            answers: AnswerMap::new(),
            lead: None,
            pending: None,
            awaiting_lead: None,
            completion: None,
            last_resolution: None,
            last_error: None,
        }
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    pub fn graph(&self) -> &QuestionGraph {
        &self.graph
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_deref().and_then(|id| self.graph.question(id))
    }

    /// The answer already selected for the current question, if any.
    pub fn current_answer(&self) -> Option<&str> {
        let current = self.current.as_ref()?;
        self.answers.get(current).map(String::as_str)
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Answered questions of the active path, in answer order.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn lead(&self) -> Option<&LeadForm> {
        self.lead.as_ref()
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    /// The bucket record of a completed decision-tree run.
    pub fn result_bucket(&self) -> Option<&ResultBucket> {
        let key = self.completion.as_ref()?.bucket_key.as_deref()?;
        self.graph.bucket(key)
    }

    /// Whether a submission has been prepared but not yet accepted.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// User-visible message of the last failed operation.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    pub fn progress(&self) -> Progress {
        let total = self
            .config
            .scoring_method
            .total_questions(&self.graph, &self.answers);
        let on_open_question = self
            .current
            .as_ref()
            .is_some_and(|current| !self.path.contains(current));
        let current = self.path.len() + usize::from(on_open_question);
        Progress {
            current: current.min(total),
            total,
        }
    }

    /// Submits a lead form.
    ///
    /// Before the questions the lead is validated and cached for the final submission.
    /// After the questions it is sent to the service for the submitted session, whose
    /// response completes the run.
    pub async fn submit_lead(&mut self, form: &LeadForm) -> Result<Transition, FlowError> {
        match self.phase {
            Phase::EmailCapture => {
                let lead = self.validated(form)?;
                self.lead = Some(lead);
                let entry = self.graph.entry_question().id.clone();
                self.current = Some(entry.clone());
                self.enter(Phase::Questions);
                Ok(Transition::Question(entry))
            }
            Phase::PostEmailCapture => {
                let lead = self.validated(form)?;
                let awaiting = self
                    .awaiting_lead
                    .clone()
                    .ok_or(FlowError::NothingToSubmit)?;
                info!(session_id = %awaiting.session_id, "capturing lead for session");
                match self
                    .service
                    .capture_lead(&awaiting.session_id, lead.clone().into())
                    .await
                {
                    Ok(response) => {
                        self.lead = Some(lead);
                        self.awaiting_lead = None;
                        Ok(self.complete(
                            awaiting.session_id,
                            response.result_url,
                            awaiting.bucket_key,
                        ))
                    }
                    Err(err) => Err(self.service_failure("capture lead", err)),
                }
            }
            phase => Err(FlowError::InvalidPhase {
                operation: "submit a lead form",
                phase,
            }),
        }
    }

    /// Answers the current question and moves on.
    pub async fn select_answer(&mut self, answer_id: &str) -> Result<Transition, FlowError> {
        self.require(Phase::Questions, "select an answer")?;
        let question_id = self.current.clone().ok_or(FlowError::NoActiveQuestion)?;
        self.answer_question(question_id, answer_id).await
    }

    /// Re-answers a question of the active path.
    ///
    /// Everything answered after that question is discarded and navigation is
    /// recomputed from the new answer.
    pub async fn revise_answer(
        &mut self,
        question_id: &str,
        answer_id: &str,
    ) -> Result<Transition, FlowError> {
        self.require(Phase::Questions, "revise an answer")?;
        let on_path = self.path.iter().any(|id| id == question_id)
            || self.current.as_deref() == Some(question_id);
        if !on_path {
            return Err(FlowError::NotVisited(question_id.to_string()));
        }
        self.answer_question(question_id.to_string(), answer_id).await
    }

    /// Returns to the previously answered question, keeping its answer preselected.
    pub fn back(&mut self) -> Result<Transition, FlowError> {
        self.require(Phase::Questions, "go back")?;
        let current_answered = self
            .current
            .as_ref()
            .is_some_and(|current| self.path.last() == Some(current));
        let depth = if current_answered { 2 } else { 1 };
        if self.path.len() < depth {
            return Err(FlowError::NoPreviousQuestion);
        }

        if current_answered {
            self.path.pop();
        }
        if let Some(current) = self.current.take() {
            self.answers.remove(&current);
        }
        let Some(previous) = self.path.pop() else {
            return Err(FlowError::NoPreviousQuestion);
        };
        self.pending = None;
        self.last_error = None;
        self.current = Some(previous.clone());
        Ok(Transition::Question(previous))
    }

    /// Re-sends a submission that failed.
    pub async fn retry_submit(&mut self) -> Result<Transition, FlowError> {
        self.require(Phase::Questions, "retry the submission")?;
        if self.pending.is_none() {
            return Err(FlowError::NothingToSubmit);
        }
        self.submit_pending().await
    }

    async fn answer_question(
        &mut self,
        question_id: String,
        answer_id: &str,
    ) -> Result<Transition, FlowError> {
        let belongs = self
            .graph
            .answers_for(&question_id)
            .iter()
            .any(|a| a.id == answer_id);
        if !belongs {
            return Err(FlowError::UnknownAnswer {
                question_id,
                answer_id: answer_id.to_string(),
            });
        }

        if let Some(pos) = self.path.iter().position(|id| *id == question_id) {
            for stale in self.path.drain(pos..) {
                self.answers.remove(&stale);
            }
        }
        if let Some(current) = self.current.take() {
            self.answers.remove(&current);
        }
        self.answers.insert(question_id.clone(), answer_id.to_string());
        self.path.push(question_id.clone());
        self.current = Some(question_id.clone());
        self.pending = None;
        self.last_error = None;

        let resolution = resolve_next(&question_id, answer_id, &self.answers, &self.graph);
        let route = resolution.route.clone();
        self.last_resolution = Some(resolution);

        match route {
            Route::Question(next) => {
                self.current = Some(next.clone());
                Ok(Transition::Question(next))
            }
            Route::Bucket(key) => {
                self.pending = Some(PendingSubmission {
                    routed_bucket: Some(key),
                });
                self.submit_pending().await
            }
            Route::End => {
                self.pending = Some(PendingSubmission {
                    routed_bucket: None,
                });
                self.submit_pending().await
            }
        }
    }

    async fn submit_pending(&mut self) -> Result<Transition, FlowError> {
        let Some(pending) = self.pending.clone() else {
            return Err(FlowError::NothingToSubmit);
        };
        let bucket_key = self
            .config
            .scoring_method
            .assigned_bucket(pending.routed_bucket);
        let request = self.submit_request(bucket_key.clone());
        info!(
            slug = %self.config.slug,
            answers = request.answers.len(),
            bucket = ?bucket_key,
            "submitting assessment"
        );

        let response = match self.service.submit(&self.config.id, request).await {
            Ok(response) => response,
            Err(err) => return Err(self.service_failure("submit", err)),
        };

        if self.config.gate_behavior == GateBehavior::PostGated {
            self.pending = None;
            self.current = None;
            self.awaiting_lead = Some(AwaitingLead {
                session_id: response.session_id.clone(),
                bucket_key,
            });
            self.enter(Phase::PostEmailCapture);
            return Ok(Transition::LeadCapture {
                session_id: response.session_id,
            });
        }

        let Some(result_url) = response.result_url else {
            let err =
                ServiceError::Rejected("submission response carried no resultUrl".to_string());
            return Err(self.service_failure("submit", err));
        };
        self.pending = None;
        Ok(self.complete(response.session_id, result_url, bucket_key))
    }

    fn submit_request(&self, result_bucket_key: Option<String>) -> SubmitRequest {
        let answers = self
            .path
            .iter()
            .filter_map(|question_id| {
                self.answers.get(question_id).map(|answer_id| AnswerSelection {
                    question_id: question_id.clone(),
                    answer_id: answer_id.clone(),
                })
            })
            .collect();
        let lead = self.lead.as_ref();
        SubmitRequest {
            answers,
            email: lead.map(|l| l.email.clone()),
            name: lead.map(|l| l.name.clone()),
            company: lead.and_then(|l| l.company.clone()),
            phone: lead.and_then(|l| l.phone.clone()),
            result_bucket_key,
        }
    }

    fn complete(
        &mut self,
        session_id: String,
        result_url: String,
        bucket_key: Option<String>,
    ) -> Transition {
        let completion = Completion {
            session_id,
            result_url,
            bucket_key,
        };
        self.current = None;
        self.last_error = None;
        self.completion = Some(completion.clone());
        self.enter(Phase::Complete);
        Transition::Complete(completion)
    }

    fn validated(&mut self, form: &LeadForm) -> Result<LeadForm, FlowError> {
        form.validate().map_err(|err| {
            self.last_error = Some(err.to_string());
            FlowError::from(err)
        })
    }

    fn service_failure(&mut self, action: &str, err: ServiceError) -> FlowError {
        warn!(slug = %self.config.slug, phase = %self.phase, error = %err, "{} failed", action);
        let err = FlowError::Service(err);
        self.last_error = Some(err.to_string());
        err
    }

    fn require(&self, phase: Phase, operation: &'static str) -> Result<(), FlowError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(FlowError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }
}
