use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::session::{
    PendingSubmission, SubmitMode, SubmitOutcome, SubmitStart, WizardSession, WizardSnapshot,
};
use crate::store::RecordStore;

/// Result of [`WizardHandle::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    Completed { record: Option<Value> },
    /// The external call or the payload mapping failed. The message is the
    /// session's submission error.
    Failed(String),
    /// Field validation failed; see the session's error map.
    Invalid,
    /// Another submission is still outstanding. No call was made.
    Busy,
    NotOnLastStep,
    /// The session was already completed or closed.
    Finished,
    /// The session was closed while the call was outstanding.
    Discarded,
}

/// A session shared between UI event handlers, with the persistence call
/// and the authenticated user injected by the host.
///
/// The session lock is never held across the external call, so the host
/// keeps handling events (and rejecting navigation) while it is outstanding.
#[derive(Clone)]
pub struct WizardHandle {
    session: Arc<Mutex<WizardSession>>,
    store: Arc<dyn RecordStore>,
    author_id: String,
}

impl WizardHandle {
    pub fn new(
        session: WizardSession,
        store: Arc<dyn RecordStore>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            store,
            author_id: author_id.into(),
        }
    }

    pub async fn update_field(&self, patch: Map<String, Value>) -> bool {
        self.session.lock().await.update_field(patch)
    }

    pub async fn validate_current_step(&self) -> bool {
        self.session.lock().await.validate_current_step()
    }

    pub async fn go_next(&self) -> bool {
        self.session.lock().await.go_next()
    }

    pub async fn go_back(&self) -> bool {
        self.session.lock().await.go_back()
    }

    pub async fn go_to(&self, step_id: &str) -> bool {
        self.session.lock().await.go_to(step_id)
    }

    pub async fn close(&self) {
        self.session.lock().await.close();
    }

    pub async fn snapshot(&self) -> WizardSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Validate, build the payload and call the store. A second call while
    /// the first is outstanding returns [`SubmitResult::Busy`] without
    /// touching the store. There is no retry.
    pub async fn submit(&self) -> SubmitResult {
        let start = self.session.lock().await.begin_submit(&self.author_id);
        let PendingSubmission {
            ticket,
            kind,
            mode,
            payload,
        } = match start {
            SubmitStart::Ready(pending) => pending,
            SubmitStart::Busy => return SubmitResult::Busy,
            SubmitStart::Finished => return SubmitResult::Finished,
            SubmitStart::NotOnLastStep => return SubmitResult::NotOnLastStep,
            SubmitStart::Invalid => return SubmitResult::Invalid,
            SubmitStart::Rejected(message) => return SubmitResult::Failed(message),
        };

        let result = match mode {
            SubmitMode::Create => self.store.create(kind, payload).await,
            SubmitMode::Update { id } => self.store.update(kind, id, payload).await,
        };

        match self.session.lock().await.complete_submit(ticket, result) {
            SubmitOutcome::Completed { record } => SubmitResult::Completed { record },
            SubmitOutcome::Failed(message) => SubmitResult::Failed(message),
            SubmitOutcome::Discarded => SubmitResult::Discarded,
        }
    }
}
