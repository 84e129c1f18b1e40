use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Form(#[from] clinica_forms::error::FormError),
}

/// Raised when a draft cannot be mapped onto a backend payload. Reported to
/// the user through the submission error, never as a field error.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdapterError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AdapterError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
