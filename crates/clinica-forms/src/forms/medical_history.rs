use std::sync::{Arc, LazyLock};

use clinica_core::models::specialty::FeedingType;
use clinica_core::{Draft, EntityKind, ErrorMap, RecordType};

use crate::form::FormDefinition;
use crate::step::{FieldSpec, InputKind, Pattern, Rule, StepDescriptor};
use crate::validators;

pub const FORM_ID: &str = "medical_history";

pub mod step_id {
    pub const BASIC_INFO: &str = "basic_info";
    pub const VITAL_SIGNS: &str = "vital_signs";
    pub const MEDICAL_BACKGROUND: &str = "medical_background";
    pub const DIAGNOSIS: &str = "diagnosis";
    pub const GYNECO_OBSTETRIC: &str = "gyneco_obstetric";
    pub const PEDIATRIC: &str = "pediatric";
}

/// The medical history wizard.
///
/// Four base pages, one specialized page chosen by the record `type`, then
/// review.
///
/// # Panics
///
/// Panics on first use if the static definition is inconsistent (duplicate
/// step ids or a bad anchor), which is a programming error.
pub fn form() -> Arc<FormDefinition> {
    static FORM: LazyLock<Arc<FormDefinition>> = LazyLock::new(|| {
        let form = FormDefinition::builder(FORM_ID, "Medical History", EntityKind::MedicalHistory)
            .step(basic_info())
            .step(vital_signs())
            .step(medical_background())
            .step(diagnosis())
            .conditional_after(step_id::DIAGNOSIS, gyneco_obstetric())
            .conditional_after(step_id::DIAGNOSIS, pediatric())
            .build()
            .unwrap_or_else(|e| panic!("invalid medical history form: {e}"));
        Arc::new(form)
    });
    Arc::clone(&FORM)
}

/// The record type selected in the draft, if any.
pub fn record_type(draft: &Draft) -> Option<RecordType> {
    draft.get_str("type").and_then(|s| s.parse().ok())
}

fn basic_info() -> StepDescriptor {
    StepDescriptor::new(
        step_id::BASIC_INFO,
        "Basic Information",
        vec![
            FieldSpec::new("patient_id", "Patient", InputKind::PatientPicker)
                .required()
                .or_from("selected_patient.id")
                .identifier(),
            FieldSpec::new("type", "Record type", InputKind::Select)
                .required()
                .one_of(RecordType::ALL.map(|t| t.as_str())),
            FieldSpec::new("visit_date", "Visit date", InputKind::Date)
                .required()
                .pattern(Pattern::Date),
            FieldSpec::new("doctor_id", "Attending doctor", InputKind::Select).identifier(),
            FieldSpec::new("chief_complaint", "Chief complaint", InputKind::TextArea)
                .required()
                .max_length(500),
        ],
    )
}

fn vital_signs() -> StepDescriptor {
    StepDescriptor::new(
        step_id::VITAL_SIGNS,
        "Vital Signs",
        vec![
            FieldSpec::new(
                "vital_signs.blood_pressure_systolic",
                "Systolic pressure",
                InputKind::Number,
            )
            .range(60.0, 250.0)
            .unit("mmHg"),
            FieldSpec::new(
                "vital_signs.blood_pressure_diastolic",
                "Diastolic pressure",
                InputKind::Number,
            )
            .range(30.0, 150.0)
            .unit("mmHg"),
            FieldSpec::new("vital_signs.heart_rate", "Heart rate", InputKind::Number)
                .integer()
                .range(30.0, 220.0)
                .unit("bpm"),
            FieldSpec::new(
                "vital_signs.respiratory_rate",
                "Respiratory rate",
                InputKind::Number,
            )
            .integer()
            .range(5.0, 60.0)
            .unit("/min"),
            FieldSpec::new("vital_signs.temperature", "Temperature", InputKind::Number)
                .range(34.0, 43.0)
                .unit("°C"),
            FieldSpec::new(
                "vital_signs.oxygen_saturation",
                "Oxygen saturation",
                InputKind::Number,
            )
            .range(50.0, 100.0)
            .unit("%"),
            FieldSpec::new("vital_signs.weight", "Weight", InputKind::Number)
                .range(0.5, 500.0)
                .unit("kg"),
            FieldSpec::new("vital_signs.height", "Height", InputKind::Number)
                .range(20.0, 250.0)
                .unit("cm"),
        ],
    )
    .cross_check(check_blood_pressure)
}

fn check_blood_pressure(draft: &Draft, errors: &mut ErrorMap) {
    const DIASTOLIC: &str = "vital_signs.blood_pressure_diastolic";
    if errors.contains(DIASTOLIC) || errors.contains("vital_signs.blood_pressure_systolic") {
        return;
    }
    if let Some(message) = validators::blood_pressure_pair(
        draft.get_path("vital_signs.blood_pressure_systolic"),
        draft.get_path(DIASTOLIC),
    ) {
        errors.insert(DIASTOLIC, message);
    }
}

fn medical_background() -> StepDescriptor {
    StepDescriptor::new(
        step_id::MEDICAL_BACKGROUND,
        "Medical Background",
        vec![
            FieldSpec::new("allergies", "Allergies", InputKind::List).rule(Rule::StringList),
            FieldSpec::new("current_medications", "Current medications", InputKind::List)
                .rule(Rule::StringList),
            FieldSpec::new("chronic_conditions", "Chronic conditions", InputKind::List)
                .rule(Rule::StringList),
            FieldSpec::new("surgical_history", "Surgical history", InputKind::TextArea)
                .max_length(2000),
            FieldSpec::new("family_history", "Family history", InputKind::TextArea)
                .max_length(2000),
        ],
    )
}

fn diagnosis() -> StepDescriptor {
    StepDescriptor::new(
        step_id::DIAGNOSIS,
        "Diagnosis & Treatment",
        vec![
            FieldSpec::new("diagnosis", "Diagnosis", InputKind::TextArea)
                .required()
                .max_length(2000),
            FieldSpec::new("treatment_plan", "Treatment plan", InputKind::TextArea)
                .max_length(2000),
            FieldSpec::new("follow_up_date", "Follow-up date", InputKind::Date)
                .pattern(Pattern::Date),
            FieldSpec::new("notes", "Notes", InputKind::TextArea).max_length(2000),
        ],
    )
}

fn gyneco_obstetric() -> StepDescriptor {
    StepDescriptor::new(
        step_id::GYNECO_OBSTETRIC,
        "Gyneco-Obstetric History",
        vec![
            FieldSpec::new(
                "gyneco_obstetric.last_menstrual_period",
                "Last menstrual period",
                InputKind::Date,
            )
            .pattern(Pattern::Date),
            FieldSpec::new("gyneco_obstetric.gravida", "Gravida", InputKind::Number)
                .integer()
                .range(0.0, 30.0),
            FieldSpec::new("gyneco_obstetric.para", "Para", InputKind::Number)
                .integer()
                .range(0.0, 30.0),
            FieldSpec::new("gyneco_obstetric.abortions", "Abortions", InputKind::Number)
                .integer()
                .range(0.0, 30.0),
            FieldSpec::new("gyneco_obstetric.cesareans", "Cesareans", InputKind::Number)
                .integer()
                .range(0.0, 20.0),
            FieldSpec::new(
                "gyneco_obstetric.contraceptive_method",
                "Contraceptive method",
                InputKind::Text,
            )
            .max_length(200),
        ],
    )
    .cross_check(check_parity)
    .visible_when(|draft| record_type(draft) == Some(RecordType::GynecoObstetric))
}

fn check_parity(draft: &Draft, errors: &mut ErrorMap) {
    const PARA: &str = "gyneco_obstetric.para";
    if errors.contains(PARA) || errors.contains("gyneco_obstetric.gravida") {
        return;
    }
    if let Some(message) = validators::not_greater_than(
        draft.get_path(PARA),
        draft.get_path("gyneco_obstetric.gravida"),
        "gravida",
    ) {
        errors.insert(PARA, message);
    }
}

fn pediatric() -> StepDescriptor {
    StepDescriptor::new(
        step_id::PEDIATRIC,
        "Pediatric History",
        vec![
            FieldSpec::new("pediatric.birth_weight", "Birth weight", InputKind::Number)
                .range(0.3, 7.0)
                .unit("kg"),
            FieldSpec::new(
                "pediatric.gestational_age_weeks",
                "Gestational age",
                InputKind::Number,
            )
            .integer()
            .range(20.0, 45.0)
            .unit("weeks"),
            FieldSpec::new("pediatric.apgar_score", "Apgar score", InputKind::Number)
                .integer()
                .range(0.0, 10.0),
            FieldSpec::new("pediatric.feeding_type", "Feeding", InputKind::Select)
                .one_of(FeedingType::ALL.map(|f| f.as_str())),
            FieldSpec::new("pediatric.vaccinations", "Vaccinations", InputKind::Records),
        ],
    )
    .cross_check(check_vaccinations)
    .visible_when(|draft| record_type(draft) == Some(RecordType::Pediatrics))
}

/// Every vaccination entry needs a vaccine name and a valid date.
fn check_vaccinations(draft: &Draft, errors: &mut ErrorMap) {
    let Some(value) = draft.get_path("pediatric.vaccinations") else {
        return;
    };
    let Some(entries) = value.as_array() else {
        errors.insert("pediatric.vaccinations", "Must be a list");
        return;
    };

    for (i, entry) in entries.iter().enumerate() {
        let vaccine = entry.get("vaccine");
        if let Some(message) = validators::required(vaccine) {
            errors.insert(format!("pediatric.vaccinations.{i}.vaccine"), message);
        }
        let date = entry.get("date");
        let message = validators::required(date)
            .or_else(|| validators::matches_pattern(date, Pattern::Date));
        if let Some(message) = message {
            errors.insert(format!("pediatric.vaccinations.{i}.date"), message);
        }
    }
}
