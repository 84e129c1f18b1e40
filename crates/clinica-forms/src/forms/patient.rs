use std::sync::{Arc, LazyLock};

use clinica_core::models::patient::Gender;
use clinica_core::{Draft, EntityKind};

use crate::form::FormDefinition;
use crate::step::{FieldSpec, InputKind, Pattern, StepDescriptor};

pub const FORM_ID: &str = "patient";

pub mod step_id {
    pub const PERSONAL_INFO: &str = "personal_info";
    pub const CONTACT: &str = "contact";
    pub const EMERGENCY_CONTACT: &str = "emergency_contact";
    pub const INSURANCE: &str = "insurance";
}

/// The patient registration wizard. The insurance page only appears once
/// `has_insurance` is checked.
///
/// # Panics
///
/// Panics on first use if the static definition is inconsistent, which is a
/// programming error.
pub fn form() -> Arc<FormDefinition> {
    static FORM: LazyLock<Arc<FormDefinition>> = LazyLock::new(|| {
        let form = FormDefinition::builder(FORM_ID, "Patient", EntityKind::Patient)
            .step(personal_info())
            .step(contact())
            .step(emergency_contact())
            .conditional_after(step_id::EMERGENCY_CONTACT, insurance())
            .build()
            .unwrap_or_else(|e| panic!("invalid patient form: {e}"));
        Arc::new(form)
    });
    Arc::clone(&FORM)
}

fn personal_info() -> StepDescriptor {
    StepDescriptor::new(
        step_id::PERSONAL_INFO,
        "Personal Information",
        vec![
            FieldSpec::new("first_name", "First name", InputKind::Text)
                .required()
                .max_length(100),
            FieldSpec::new("last_name", "Last name", InputKind::Text)
                .required()
                .max_length(100),
            FieldSpec::new("date_of_birth", "Date of birth", InputKind::Date)
                .required()
                .pattern(Pattern::Date),
            FieldSpec::new("gender", "Gender", InputKind::Select)
                .required()
                .one_of(Gender::ALL.map(|g| g.as_str())),
            FieldSpec::new("national_id", "National ID", InputKind::Text).max_length(50),
        ],
    )
}

fn contact() -> StepDescriptor {
    StepDescriptor::new(
        step_id::CONTACT,
        "Contact Details",
        vec![
            FieldSpec::new("phone", "Phone", InputKind::Phone)
                .required()
                .pattern(Pattern::Phone),
            FieldSpec::new("email", "Email", InputKind::Email).pattern(Pattern::Email),
            FieldSpec::new("address", "Address", InputKind::TextArea).max_length(500),
        ],
    )
}

fn emergency_contact() -> StepDescriptor {
    StepDescriptor::new(
        step_id::EMERGENCY_CONTACT,
        "Emergency Contact",
        vec![
            FieldSpec::new("emergency_contact.name", "Name", InputKind::Text).max_length(100),
            FieldSpec::new(
                "emergency_contact.relationship",
                "Relationship",
                InputKind::Text,
            )
            .max_length(50),
            FieldSpec::new("emergency_contact.phone", "Phone", InputKind::Phone)
                .pattern(Pattern::Phone),
            FieldSpec::new("has_insurance", "Has health insurance", InputKind::Checkbox),
        ],
    )
}

fn insurance() -> StepDescriptor {
    StepDescriptor::new(
        step_id::INSURANCE,
        "Insurance",
        vec![
            FieldSpec::new("insurance.provider", "Provider", InputKind::Text)
                .required()
                .max_length(100),
            FieldSpec::new("insurance.policy_number", "Policy number", InputKind::Text)
                .required()
                .max_length(50),
            FieldSpec::new("insurance.valid_until", "Valid until", InputKind::Date)
                .pattern(Pattern::Date),
        ],
    )
    .visible_when(has_insurance)
}

pub fn has_insurance(draft: &Draft) -> bool {
    draft.get_bool("has_insurance").unwrap_or(false)
}
