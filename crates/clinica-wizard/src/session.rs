//! The wizard controller.
//!
//! A [`WizardSession`] owns the draft, the resolved step list, the current
//! step index and the two error channels of one open form: the per-field
//! [`ErrorMap`] and a single submission error.
//!
//! Submission is split in two so the host can await the external call
//! without holding the session: [`WizardSession::begin_submit`] validates,
//! builds the payload and marks the session as submitting;
//! [`WizardSession::complete_submit`] applies the result. While submitting,
//! navigation and field updates are no-ops.

use std::sync::Arc;

use clinica_audit::events::{AuditAction, AuditEvent};
use clinica_core::{Draft, EntityKind, ErrorMap};
use clinica_forms::{FieldSpec, FormDefinition, Step, resolve_steps};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::adapter;
use crate::error::WizardError;
use crate::store::StoreRejection;

/// Whether the finished draft creates a new record or updates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "mode", rename_all = "snake_case")]
#[ts(export)]
pub enum SubmitMode {
    Create,
    Update { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionStatus {
    Editing,
    Submitting,
    /// The record was persisted. The session accepts no further input.
    Completed,
    /// The host closed the form. Late submission results are ignored.
    Closed,
}

/// Everything the host needs to perform the external call.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: Uuid,
    pub kind: EntityKind,
    pub mode: SubmitMode,
    pub payload: Value,
}

/// Result of [`WizardSession::begin_submit`].
#[derive(Debug, Clone)]
pub enum SubmitStart {
    /// A submission is already outstanding.
    Busy,
    /// The session is completed or closed.
    Finished,
    /// Submission is only possible from the review step.
    NotOnLastStep,
    /// Validation failed; the error map is populated.
    Invalid,
    /// The draft could not be mapped onto a payload; the submission error
    /// is set.
    Rejected(String),
    Ready(PendingSubmission),
}

/// Result of [`WizardSession::complete_submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Completed { record: Option<Value> },
    Failed(String),
    /// The session was closed or the ticket is stale; nothing was applied.
    Discarded,
}

/// One rendered page as seen by a frontend.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct StepSummary {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

/// Serializable view of a session.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct WizardSnapshot {
    pub form_id: String,
    pub steps: Vec<StepSummary>,
    pub current_step_index: usize,
    pub current_step_id: String,
    pub draft: Value,
    pub errors: ErrorMap,
    pub submitting: bool,
    pub submit_error: Option<String>,
    pub status: SessionStatus,
}

struct InFlight {
    ticket: Uuid,
    author_id: String,
}

pub struct WizardSession {
    form: Arc<FormDefinition>,
    mode: SubmitMode,
    steps: Vec<Arc<dyn Step>>,
    current: usize,
    draft: Draft,
    errors: ErrorMap,
    submit_error: Option<String>,
    status: SessionStatus,
    in_flight: Option<InFlight>,
    persisted: Option<Value>,
}

impl WizardSession {
    pub fn new(form: Arc<FormDefinition>, mode: SubmitMode, draft: Draft) -> Self {
        let steps = resolve_steps(&form, &draft);
        Self {
            form,
            mode,
            steps,
            current: 0,
            draft,
            errors: ErrorMap::new(),
            submit_error: None,
            status: SessionStatus::Editing,
            in_flight: None,
            persisted: None,
        }
    }

    /// Open a session for a registered form.
    pub fn for_form(form_id: &str, mode: SubmitMode, draft: Draft) -> Result<Self, WizardError> {
        let form = clinica_forms::get_form(form_id)?;
        Ok(Self::new(form, mode, draft))
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn mode(&self) -> &SubmitMode {
        &self.mode
    }

    pub fn steps(&self) -> &[Arc<dyn Step>] {
        &self.steps
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id()).collect()
    }

    pub fn current_step_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &Arc<dyn Step> {
        &self.steps[self.current]
    }

    pub fn is_on_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SessionStatus::Submitting
    }

    /// The record returned by the backend after a completed submission.
    pub fn persisted(&self) -> Option<&Value> {
        self.persisted.as_ref()
    }

    /// Merge a partial object into the draft (see
    /// [`clinica_core::draft::merge_one_level`]) and clear errors for the
    /// touched fields only. Returns `false` when the session does not accept
    /// edits.
    pub fn update_field(&mut self, patch: Map<String, Value>) -> bool {
        if self.status != SessionStatus::Editing {
            debug!(status = ?self.status, "ignoring field update");
            return false;
        }

        for path in self.draft.merge(patch) {
            self.errors.clear_path(&path);
        }
        self.refresh_steps();
        true
    }

    /// Run the current step's validation and replace the error map with the
    /// result. Returns whether the step is valid.
    pub fn validate_current_step(&mut self) -> bool {
        self.errors = self.current_step().validate(&self.draft);
        self.errors.is_empty()
    }

    /// Advance one step if the current step validates.
    pub fn go_next(&mut self) -> bool {
        if self.status != SessionStatus::Editing {
            return false;
        }

        self.refresh_steps();
        if !self.validate_current_step() {
            debug!(
                step = self.current_step().id(),
                errors = self.errors.len(),
                "step did not validate"
            );
            return false;
        }

        if self.current + 1 >= self.steps.len() {
            return false;
        }
        self.current += 1;
        debug!(step = self.current_step().id(), index = self.current, "advanced");
        true
    }

    /// Go back one step. Never validates.
    pub fn go_back(&mut self) -> bool {
        if self.status != SessionStatus::Editing || self.current == 0 {
            return false;
        }
        self.current -= 1;
        debug!(step = self.current_step().id(), index = self.current, "went back");
        true
    }

    /// Jump back to an earlier step, e.g. from the review page. Forward jumps
    /// would skip validation and are refused.
    pub fn go_to(&mut self, step_id: &str) -> bool {
        if self.status != SessionStatus::Editing {
            return false;
        }
        match self.steps.iter().position(|s| s.id() == step_id) {
            Some(index) if index <= self.current => {
                self.current = index;
                true
            }
            _ => false,
        }
    }

    /// Start a submission from the last step.
    pub fn begin_submit(&mut self, author_id: &str) -> SubmitStart {
        match self.status {
            SessionStatus::Submitting => return SubmitStart::Busy,
            SessionStatus::Completed | SessionStatus::Closed => return SubmitStart::Finished,
            SessionStatus::Editing => {}
        }

        self.refresh_steps();
        if !self.is_on_last_step() {
            return SubmitStart::NotOnLastStep;
        }

        self.submit_error = None;
        if !self.validate_current_step() {
            return SubmitStart::Invalid;
        }

        let kind = self.form.kind();
        let payload = match adapter::build_payload(kind, &self.draft, author_id) {
            Ok(payload) => payload,
            Err(e) => {
                let message = e.to_string();
                warn!(form = self.form.id(), error = %message, "draft could not be mapped");
                self.submit_error = Some(message.clone());
                return SubmitStart::Rejected(message);
            }
        };

        let ticket = Uuid::new_v4();
        self.in_flight = Some(InFlight {
            ticket,
            author_id: author_id.to_string(),
        });
        self.status = SessionStatus::Submitting;
        info!(form = self.form.id(), %ticket, "submission started");

        SubmitStart::Ready(PendingSubmission {
            ticket,
            kind,
            mode: self.mode.clone(),
            payload,
        })
    }

    /// Apply the result of the external call started by
    /// [`begin_submit`](Self::begin_submit).
    pub fn complete_submit(
        &mut self,
        ticket: Uuid,
        result: Result<Option<Value>, StoreRejection>,
    ) -> SubmitOutcome {
        if self.status == SessionStatus::Closed {
            warn!(%ticket, "session closed; ignoring late submission result");
            return SubmitOutcome::Discarded;
        }
        let Some(in_flight) = self.in_flight.take_if(|f| f.ticket == ticket) else {
            warn!(%ticket, "no matching submission in flight");
            return SubmitOutcome::Discarded;
        };

        match result {
            Ok(record) => {
                self.status = SessionStatus::Completed;
                self.persisted = record.clone();
                info!(form = self.form.id(), %ticket, "submission completed");
                self.audit(&in_flight.author_id, record.as_ref());
                SubmitOutcome::Completed { record }
            }
            Err(rejection) => {
                self.status = SessionStatus::Editing;
                self.submit_error = Some(rejection.message.clone());
                warn!(form = self.form.id(), %ticket, error = %rejection, "submission failed");
                SubmitOutcome::Failed(rejection.message)
            }
        }
    }

    /// Mark the session as closed by the host. Any outstanding submission
    /// result is ignored when it arrives.
    pub fn close(&mut self) {
        if self.status != SessionStatus::Closed {
            debug!(form = self.form.id(), "session closed");
            self.status = SessionStatus::Closed;
        }
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            form_id: self.form.id().to_string(),
            steps: self
                .steps
                .iter()
                .map(|s| StepSummary {
                    id: s.id().to_string(),
                    title: s.title().to_string(),
                    fields: s.fields().to_vec(),
                })
                .collect(),
            current_step_index: self.current,
            current_step_id: self.current_step().id().to_string(),
            draft: self.draft.to_value(),
            errors: self.errors.clone(),
            submitting: self.is_submitting(),
            submit_error: self.submit_error.clone(),
            status: self.status,
        }
    }

    /// Re-resolve the step list and keep the index on the same step when it
    /// survives. A step that disappeared leaves the index in place, clamped
    /// to the last valid position.
    fn refresh_steps(&mut self) {
        let current_id = self.current_step().id().to_string();
        let steps = resolve_steps(&self.form, &self.draft);
        self.current = steps
            .iter()
            .position(|s| s.id() == current_id)
            .unwrap_or_else(|| self.current.min(steps.len() - 1));
        self.steps = steps;
    }

    fn audit(&self, author_id: &str, record: Option<&Value>) {
        let (action, resource_id) = match &self.mode {
            SubmitMode::Create => (
                AuditAction::Create,
                record
                    .and_then(|r| r.get("id"))
                    .map(|id| match id {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default(),
            ),
            SubmitMode::Update { id } => (AuditAction::Update, id.clone()),
        };
        AuditEvent::new(action, self.form.kind(), resource_id, author_id)
            .with_details(serde_json::json!({ "form": self.form.id() }))
            .emit();
    }
}
