use clinica_core::Draft;
use clinica_forms::forms::{medical_history, patient};
use clinica_forms::{resolve_step_ids, resolve_steps};
use serde_json::json;

fn draft(value: serde_json::Value) -> Draft {
    Draft::from_value(value).unwrap()
}

#[test]
fn general_record_excludes_specialized_steps() {
    let form = medical_history::form();
    let ids = resolve_step_ids(&form, &draft(json!({ "type": "general" })));

    assert_eq!(
        ids,
        vec!["basic_info", "vital_signs", "medical_background", "diagnosis", "review"]
    );
}

#[test]
fn pediatrics_record_inserts_pediatric_step_before_review() {
    let form = medical_history::form();
    let steps = resolve_steps(&form, &draft(json!({ "type": "pediatrics" })));

    let specialized: Vec<_> = steps
        .iter()
        .filter(|s| s.id() == "pediatric" || s.id() == "gyneco_obstetric")
        .collect();
    assert_eq!(specialized.len(), 1);
    assert_eq!(specialized[0].title(), "Pediatric History");

    let n = steps.len();
    assert_eq!(steps[n - 2].id(), "pediatric");
    assert_eq!(steps[n - 1].id(), "review");
}

#[test]
fn gyneco_obstetric_record_inserts_its_step() {
    let form = medical_history::form();
    let ids = resolve_step_ids(&form, &draft(json!({ "type": "gyneco_obstetric" })));
    assert!(ids.contains(&"gyneco_obstetric".to_string()));
    assert!(!ids.contains(&"pediatric".to_string()));
}

#[test]
fn missing_or_unknown_type_shows_base_steps_only() {
    let form = medical_history::form();
    let base = resolve_step_ids(&form, &Draft::new());
    let unknown = resolve_step_ids(&form, &draft(json!({ "type": "surgery" })));
    assert_eq!(base.len(), 5);
    assert_eq!(base, unknown);
}

#[test]
fn resolution_is_deterministic_and_never_accumulates() {
    let form = medical_history::form();
    let a = draft(json!({ "type": "pediatrics", "diagnosis": "otitis" }));
    let b = draft(json!({ "diagnosis": "otitis", "type": "pediatrics" }));

    let first = resolve_step_ids(&form, &a);
    for _ in 0..5 {
        assert_eq!(resolve_step_ids(&form, &a), first);
    }
    assert_eq!(resolve_step_ids(&form, &b), first);
    assert_eq!(first.iter().filter(|id| *id == "pediatric").count(), 1);
}

#[test]
fn review_is_always_last() {
    for form in clinica_forms::all_forms() {
        let steps = resolve_steps(&form, &Draft::new());
        let last = steps.last().unwrap();
        assert!(last.is_terminal());
        assert_eq!(last.id(), "review");
    }
}

#[test]
fn patient_insurance_step_follows_checkbox() {
    let form = patient::form();
    let without = resolve_step_ids(&form, &draft(json!({ "has_insurance": false })));
    let with = resolve_step_ids(&form, &draft(json!({ "has_insurance": true })));

    assert!(!without.contains(&"insurance".to_string()));
    assert_eq!(
        with,
        vec!["personal_info", "contact", "emergency_contact", "insurance", "review"]
    );
}
