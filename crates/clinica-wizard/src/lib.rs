//! clinica-wizard
//!
//! The wizard controller: a per-form editing session with guarded
//! navigation, the submission adapter that turns a finished draft into a
//! backend payload, and the injected persistence seam.

pub mod adapter;
pub mod error;
pub mod handle;
pub mod session;
pub mod store;

pub use handle::{SubmitResult, WizardHandle};
pub use session::{
    PendingSubmission, SessionStatus, SubmitMode, SubmitOutcome, SubmitStart, WizardSession,
    WizardSnapshot,
};
pub use store::{RecordStore, StoreRejection};
