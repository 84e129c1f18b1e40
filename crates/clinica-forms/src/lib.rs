//! clinica-forms
//!
//! Wizard form definitions. Pure data and pure functions: field validators,
//! step descriptors, the step resolver, and the built-in medical history and
//! patient forms.

pub mod error;
pub mod form;
pub mod forms;
pub mod resolver;
pub mod step;
pub mod validators;

use std::sync::Arc;

use error::FormError;

pub use form::{FormDefinition, Placement};
pub use resolver::{resolve_step_ids, resolve_steps};
pub use step::{FieldSpec, InputKind, Pattern, Rule, Step, StepDescriptor};

/// Return all registered forms.
pub fn all_forms() -> Vec<Arc<FormDefinition>> {
    vec![forms::medical_history::form(), forms::patient::form()]
}

/// Look up a form by ID.
pub fn get_form(id: &str) -> Result<Arc<FormDefinition>, FormError> {
    all_forms()
        .into_iter()
        .find(|f| f.id() == id)
        .ok_or_else(|| FormError::UnknownForm(id.to_string()))
}
