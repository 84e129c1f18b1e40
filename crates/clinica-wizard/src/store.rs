use std::future::Future;
use std::pin::Pin;

use clinica_core::EntityKind;
use serde_json::Value;
use thiserror::Error;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Why the backend refused a create or update. Shown to the user verbatim
/// as the submission error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreRejection {
    pub message: String,
}

impl StoreRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The persistence operation a wizard submits through. Supplied by the host
/// so the wizard itself never touches the network.
///
/// Both calls return the persisted record when the backend echoes it back.
pub trait RecordStore: Send + Sync {
    fn create(
        &self,
        kind: EntityKind,
        payload: Value,
    ) -> BoxFuture<'_, Result<Option<Value>, StoreRejection>>;

    fn update(
        &self,
        kind: EntityKind,
        id: String,
        payload: Value,
    ) -> BoxFuture<'_, Result<Option<Value>, StoreRejection>>;
}
