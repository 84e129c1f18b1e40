use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("draft is not a JSON object")]
    NotAnObject,

    #[error("unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),
}
