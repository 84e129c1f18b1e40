use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown form: {0}")]
    UnknownForm(String),

    #[error("duplicate step id '{step_id}' in form '{form_id}'")]
    DuplicateStep { form_id: String, step_id: String },

    #[error("conditional step '{step_id}' is anchored on unknown base step '{anchor}'")]
    UnknownAnchor { step_id: String, anchor: String },

    #[error("form '{0}' has no base steps")]
    NoSteps(String),
}
