use std::sync::Arc;

use clinica_core::{Draft, EntityKind};
use clinica_forms::error::FormError;
use clinica_forms::forms::{medical_history, patient};
use clinica_forms::{FieldSpec, FormDefinition, InputKind, StepDescriptor, get_form};
use serde_json::json;

fn draft(value: serde_json::Value) -> Draft {
    Draft::from_value(value).unwrap()
}

#[test]
fn registry_finds_forms_by_id() {
    assert_eq!(get_form("medical_history").unwrap().kind(), EntityKind::MedicalHistory);
    assert_eq!(get_form("patient").unwrap().kind(), EntityKind::Patient);
    assert!(matches!(
        get_form("booking"),
        Err(FormError::UnknownForm(ref id)) if id == "booking"
    ));
}

#[test]
fn steps_are_looked_up_by_id() {
    let form = medical_history::form();
    let step = form.step("vital_signs").unwrap();
    assert_eq!(step.title(), "Vital Signs");
    assert!(step.fields().iter().all(|f| f.path.starts_with("vital_signs.")));
    assert!(form.step("review").unwrap().is_terminal());
    assert!(form.step("billing").is_none());
}

#[test]
fn template_order_lists_every_step() {
    let form = medical_history::form();
    assert_eq!(
        form.all_step_ids(),
        vec![
            "basic_info",
            "vital_signs",
            "medical_background",
            "diagnosis",
            "gyneco_obstetric",
            "pediatric",
            "review"
        ]
    );
}

#[test]
fn required_fields_come_from_field_specs() {
    let form = medical_history::form();
    let basic = form.step("basic_info").unwrap();
    assert_eq!(
        basic.required_fields(),
        vec!["patient_id", "type", "visit_date", "chief_complaint"]
    );
}

#[test]
fn systolic_out_of_range_is_keyed_on_the_field() {
    let form = medical_history::form();
    let step = form.step("vital_signs").unwrap();

    let errors = step.validate(&draft(json!({
        "vital_signs": { "blood_pressure_systolic": 400 }
    })));
    assert_eq!(
        errors.get("vital_signs.blood_pressure_systolic"),
        Some("Must be between 60 and 250")
    );

    let errors = step.validate(&draft(json!({ "vital_signs": { "heart_rate": 70 } })));
    assert!(!errors.contains("vital_signs.blood_pressure_systolic"));
    assert!(errors.is_empty());
}

#[test]
fn diastolic_must_be_below_systolic() {
    let form = medical_history::form();
    let step = form.step("vital_signs").unwrap();
    let errors = step.validate(&draft(json!({
        "vital_signs": { "blood_pressure_systolic": 110, "blood_pressure_diastolic": 120 }
    })));
    assert!(errors.contains("vital_signs.blood_pressure_diastolic"));
}

#[test]
fn patient_reference_can_come_from_selected_patient() {
    let form = medical_history::form();
    let step = form.step("basic_info").unwrap();
    let base = json!({
        "type": "general",
        "visit_date": "2026-10-01",
        "chief_complaint": "cough",
    });

    let errors = step.validate(&draft(base.clone()));
    assert_eq!(errors.get("patient_id"), Some("This field is required"));

    let mut with_selection = base;
    with_selection["selected_patient"] = json!({ "id": "p-42", "name": "Ana Ruiz" });
    assert!(step.validate(&draft(with_selection)).is_empty());
}

#[test]
fn selected_patient_must_carry_a_usable_id() {
    let form = medical_history::form();
    let step = form.step("basic_info").unwrap();
    let mut value = json!({
        "selected_patient": { "id": true },
        "type": "general",
        "visit_date": "2026-10-01",
        "chief_complaint": "cough",
    });

    let errors = step.validate(&draft(value.clone()));
    assert_eq!(errors.get("patient_id"), Some("Must be a valid identifier"));
    assert!(!errors.contains("selected_patient.id"));

    value["selected_patient"]["id"] = json!(42);
    assert!(step.validate(&draft(value)).is_empty());
}

#[test]
fn vaccination_entries_are_validated_individually() {
    let form = medical_history::form();
    let step = form.step("pediatric").unwrap();
    let errors = step.validate(&draft(json!({
        "type": "pediatrics",
        "pediatric": {
            "vaccinations": [
                { "vaccine": "BCG", "date": "2024-01-10" },
                { "vaccine": "", "date": "2024-13-01" }
            ]
        }
    })));

    assert!(errors.contains("pediatric.vaccinations.1.vaccine"));
    assert!(errors.contains("pediatric.vaccinations.1.date"));
    assert!(!errors.contains("pediatric.vaccinations.0.date"));
}

#[test]
fn para_cannot_exceed_gravida() {
    let form = medical_history::form();
    let step = form.step("gyneco_obstetric").unwrap();
    let errors = step.validate(&draft(json!({
        "gyneco_obstetric": { "gravida": 1, "para": 2 }
    })));
    assert_eq!(
        errors.get("gyneco_obstetric.para"),
        Some("Cannot be greater than gravida")
    );
}

#[test]
fn review_aggregates_only_visible_steps() {
    let form = medical_history::form();
    let review = form.review_step();
    let errors = review.validate(&draft(json!({
        "patient_id": "p-1",
        "type": "general",
        "visit_date": "2026-10-01",
        "chief_complaint": "headache",
        "diagnosis": "tension headache",
        "pediatric": { "apgar_score": 99 }
    })));
    // The pediatric page is hidden for general records, so its data is ignored.
    assert!(errors.is_empty());

    let errors = review.validate(&draft(json!({ "type": "pediatrics", "pediatric": { "apgar_score": 99 } })));
    assert!(errors.contains("pediatric.apgar_score"));
    assert!(errors.contains("diagnosis"));
}

#[test]
fn validation_is_idempotent() {
    let form = patient::form();
    let step = form.step("contact").unwrap();
    let d = draft(json!({ "phone": "+1 (555", "email": "x@" }));
    assert_eq!(step.validate(&d), step.validate(&d));
}

#[test]
fn builder_rejects_unknown_anchor_and_duplicates() {
    let unknown = FormDefinition::builder("demo", "Demo", EntityKind::Patient)
        .step(StepDescriptor::new("a", "A", vec![]))
        .conditional_after("missing", StepDescriptor::new("b", "B", vec![]))
        .build();
    assert!(matches!(unknown, Err(FormError::UnknownAnchor { .. })));

    let duplicate = FormDefinition::builder("demo", "Demo", EntityKind::Patient)
        .step(StepDescriptor::new(
            "a",
            "A",
            vec![FieldSpec::new("x", "X", InputKind::Text)],
        ))
        .step(StepDescriptor::new("a", "A again", vec![]))
        .build();
    assert!(matches!(duplicate, Err(FormError::DuplicateStep { .. })));

    let empty = FormDefinition::builder("demo", "Demo", EntityKind::Patient).build();
    assert!(matches!(empty, Err(FormError::NoSteps(_))));
}

#[test]
fn forms_are_shared_instances() {
    assert!(Arc::ptr_eq(&medical_history::form(), &medical_history::form()));
}
