mod common;

use clinica_core::Draft;
use clinica_forms::error::FormError;
use clinica_wizard::error::WizardError;
use clinica_wizard::{
    SessionStatus, StoreRejection, SubmitMode, SubmitOutcome, SubmitStart, WizardSession,
};
use common::{
    general_history, medical_history_session, object, session_on_review,
    unmappable_session_on_review,
};
use serde_json::json;

#[test]
fn starts_on_first_step_with_no_errors() {
    let session = medical_history_session(json!({}));
    assert_eq!(session.current_step_index(), 0);
    assert_eq!(session.current_step().id(), "basic_info");
    assert!(session.errors().is_empty());
    assert_eq!(session.status(), SessionStatus::Editing);
}

#[test]
fn go_next_is_blocked_by_validation_errors() {
    let mut session = medical_history_session(json!({ "type": "general" }));

    assert!(!session.go_next());
    assert_eq!(session.current_step_index(), 0);
    assert_eq!(session.errors().get("patient_id"), Some("This field is required"));
    assert!(session.errors().contains("visit_date"));
    assert!(session.errors().contains("chief_complaint"));
}

#[test]
fn go_next_advances_once_valid() {
    let mut session = medical_history_session(general_history());
    assert!(session.go_next());
    assert_eq!(session.current_step().id(), "vital_signs");
    assert!(session.errors().is_empty());
}

#[test]
fn go_back_never_validates_and_floors_at_zero() {
    let mut session = medical_history_session(general_history());
    session.go_next();
    session.go_next();
    assert_eq!(session.current_step_index(), 2);

    session.update_field(object(json!({ "diagnosis": null, "visit_date": "soon" })));
    assert!(session.go_back());
    assert_eq!(session.current_step_index(), 1);
    assert!(session.go_back());
    assert_eq!(session.current_step_index(), 0);
    assert!(!session.go_back());
    assert_eq!(session.current_step_index(), 0);
}

#[test]
fn update_then_null_leaves_key_absent() {
    let mut session = medical_history_session(json!({}));
    assert!(session.update_field(object(json!({ "a": "x" }))));
    assert!(session.draft().contains_key("a"));
    assert!(session.update_field(object(json!({ "a": null }))));
    assert!(!session.draft().contains_key("a"));
}

#[test]
fn update_clears_errors_for_touched_fields_only() {
    let mut session = medical_history_session(json!({}));
    session.validate_current_step();
    assert!(session.errors().contains("visit_date"));
    assert!(session.errors().contains("chief_complaint"));

    session.update_field(object(json!({ "visit_date": "2026-10-01" })));
    assert!(!session.errors().contains("visit_date"));
    assert!(session.errors().contains("chief_complaint"));
}

#[test]
fn nested_update_clears_nested_error() {
    let mut session = medical_history_session(general_history());
    session.go_next();
    session.update_field(object(json!({
        "vital_signs": { "blood_pressure_systolic": 400, "heart_rate": 300 }
    })));
    assert!(!session.go_next());
    assert!(session.errors().contains("vital_signs.blood_pressure_systolic"));
    assert!(session.errors().contains("vital_signs.heart_rate"));

    session.update_field(object(json!({ "vital_signs": { "blood_pressure_systolic": 120 } })));
    assert!(!session.errors().contains("vital_signs.blood_pressure_systolic"));
    assert!(session.errors().contains("vital_signs.heart_rate"));
    // The untouched nested value survives the merge.
    assert_eq!(session.draft().get_number("vital_signs.temperature"), Some(37.2));
}

#[test]
fn validate_current_step_is_idempotent() {
    let mut session = medical_history_session(json!({ "visit_date": "2026-1" }));
    let first_valid = session.validate_current_step();
    let first = session.errors().clone();
    let second_valid = session.validate_current_step();
    assert_eq!(first_valid, second_valid);
    assert_eq!(&first, session.errors());
}

#[test]
fn vital_signs_range_scenario() {
    let mut draft = general_history();
    draft["vital_signs"] = json!({ "blood_pressure_systolic": 400 });
    let mut session = medical_history_session(draft);
    session.go_next();
    assert_eq!(session.current_step().id(), "vital_signs");

    assert!(!session.validate_current_step());
    assert_eq!(
        session.errors().get("vital_signs.blood_pressure_systolic"),
        Some("Must be between 60 and 250")
    );

    session.update_field(object(json!({ "vital_signs": { "blood_pressure_systolic": null } })));
    assert!(session.validate_current_step());
    assert!(!session.errors().contains("vital_signs.blood_pressure_systolic"));
}

#[test]
fn changing_type_inserts_specialized_step_before_review() {
    let mut session = medical_history_session(general_history());
    assert_eq!(session.steps().len(), 5);

    session.update_field(object(json!({ "type": "pediatrics" })));
    assert_eq!(
        session.step_ids(),
        vec![
            "basic_info",
            "vital_signs",
            "medical_background",
            "diagnosis",
            "pediatric",
            "review"
        ]
    );
    assert_eq!(session.current_step().id(), "basic_info");
}

#[test]
fn index_follows_current_step_when_list_changes() {
    let mut draft = general_history();
    draft["type"] = json!("pediatrics");
    let mut session = medical_history_session(draft);
    while session.current_step().id() != "review" {
        assert!(session.go_next(), "errors: {:?}", session.errors());
    }
    assert_eq!(session.current_step_index(), 5);

    // Switching to general removes the pediatric page; review is now index 4.
    session.update_field(object(json!({ "type": "general" })));
    assert_eq!(session.current_step().id(), "review");
    assert_eq!(session.current_step_index(), 4);
}

#[test]
fn index_is_clamped_when_current_step_disappears() {
    let mut draft = general_history();
    draft["type"] = json!("gyneco_obstetric");
    let mut session = medical_history_session(draft);
    for _ in 0..4 {
        assert!(session.go_next());
    }
    assert_eq!(session.current_step().id(), "gyneco_obstetric");

    session.update_field(object(json!({ "type": "general" })));
    assert_eq!(session.steps().len(), 5);
    assert_eq!(session.current_step_index(), 4);
    assert_eq!(session.current_step().id(), "review");
}

#[test]
fn go_to_only_jumps_backwards() {
    let mut session = session_on_review();
    assert!(!session.go_to("missing"));
    assert!(session.go_to("vital_signs"));
    assert_eq!(session.current_step().id(), "vital_signs");
    assert!(!session.go_to("review"));
}

#[test]
fn submit_requires_last_step() {
    let mut session = medical_history_session(general_history());
    assert!(matches!(session.begin_submit("u-1"), SubmitStart::NotOnLastStep));
    assert!(!session.is_submitting());
}

#[test]
fn review_revalidates_earlier_steps() {
    let mut session = session_on_review();
    session.update_field(object(json!({ "diagnosis": "" })));
    assert!(matches!(session.begin_submit("u-1"), SubmitStart::Invalid));
    assert_eq!(session.errors().get("diagnosis"), Some("This field is required"));
    assert!(!session.is_submitting());
}

#[test]
fn navigation_is_a_no_op_while_submitting() {
    let mut session = session_on_review();
    let index = session.current_step_index();
    let SubmitStart::Ready(pending) = session.begin_submit("u-1") else {
        panic!("expected a pending submission");
    };

    assert!(session.is_submitting());
    assert!(!session.go_back());
    assert!(!session.go_next());
    assert!(!session.go_to("basic_info"));
    assert!(!session.update_field(object(json!({ "type": "pediatrics" }))));
    assert_eq!(session.current_step_index(), index);
    assert!(matches!(session.begin_submit("u-1"), SubmitStart::Busy));

    let outcome = session.complete_submit(pending.ticket, Ok(Some(json!({ "id": "mh-1" }))));
    assert_eq!(
        outcome,
        SubmitOutcome::Completed {
            record: Some(json!({ "id": "mh-1" }))
        }
    );
    assert_eq!(session.status(), SessionStatus::Completed);
    assert!(!session.go_back());
    assert!(matches!(session.begin_submit("u-1"), SubmitStart::Finished));
}

#[test]
fn failed_submission_keeps_draft_and_field_errors() {
    let mut session = session_on_review();
    let draft_before = session.draft().clone();
    let errors_before = session.errors().clone();

    let SubmitStart::Ready(pending) = session.begin_submit("u-1") else {
        panic!("expected a pending submission");
    };
    let outcome = session.complete_submit(
        pending.ticket,
        Err(StoreRejection::new("network error")),
    );

    assert_eq!(outcome, SubmitOutcome::Failed("network error".to_string()));
    assert!(!session.is_submitting());
    assert_eq!(session.submit_error(), Some("network error"));
    assert_eq!(session.draft(), &draft_before);
    assert_eq!(session.errors(), &errors_before);

    // Retrying clears the banner.
    assert!(matches!(session.begin_submit("u-1"), SubmitStart::Ready(_)));
    assert_eq!(session.submit_error(), None);
}

#[test]
fn unmappable_draft_is_rejected_through_the_submit_error() {
    let mut session = unmappable_session_on_review();
    let draft_before = session.draft().clone();

    let SubmitStart::Rejected(message) = session.begin_submit("u-1") else {
        panic!("expected a rejection");
    };
    assert_eq!(message, "missing required field: patient_id");
    assert_eq!(session.submit_error(), Some(message.as_str()));
    assert!(session.errors().is_empty());
    assert!(!session.is_submitting());
    assert_eq!(session.status(), SessionStatus::Editing);
    assert_eq!(session.draft(), &draft_before);

    // No ticket was issued, so nothing can complete.
    let outcome = session.complete_submit(uuid::Uuid::new_v4(), Ok(None));
    assert_eq!(outcome, SubmitOutcome::Discarded);
    assert_eq!(session.status(), SessionStatus::Editing);
}

#[test]
fn stale_ticket_and_closed_session_are_discarded() {
    let mut session = session_on_review();
    let SubmitStart::Ready(pending) = session.begin_submit("u-1") else {
        panic!("expected a pending submission");
    };

    let stale = session.complete_submit(uuid::Uuid::new_v4(), Ok(None));
    assert_eq!(stale, SubmitOutcome::Discarded);
    assert!(session.is_submitting());

    session.close();
    let late = session.complete_submit(pending.ticket, Ok(None));
    assert_eq!(late, SubmitOutcome::Discarded);
    assert_eq!(session.status(), SessionStatus::Closed);
    assert!(session.persisted().is_none());
}

#[test]
fn pending_submission_carries_payload_and_mode() {
    let mut session = WizardSession::for_form(
        "medical_history",
        SubmitMode::Update {
            id: "mh-9".to_string(),
        },
        Draft::from_value(general_history()).unwrap(),
    )
    .unwrap();
    while !session.is_on_last_step() {
        assert!(session.go_next());
    }

    let SubmitStart::Ready(pending) = session.begin_submit("u-5") else {
        panic!("expected a pending submission");
    };
    assert_eq!(pending.mode, SubmitMode::Update { id: "mh-9".to_string() });
    assert_eq!(pending.payload["patient_id"], "p-17");
    assert_eq!(pending.payload["author_id"], "u-5");
    assert!(pending.payload.get("selected_patient").is_none());
}

#[test]
fn snapshot_reflects_session() {
    let mut session = medical_history_session(json!({}));
    session.go_next();
    let snapshot = session.snapshot();

    assert_eq!(snapshot.form_id, "medical_history");
    assert_eq!(snapshot.current_step_id, "basic_info");
    assert_eq!(snapshot.steps.len(), 5);
    assert!(!snapshot.steps[0].fields.is_empty());
    assert!(!snapshot.errors.is_empty());
    assert!(!snapshot.submitting);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["status"], "editing");
    assert_eq!(json["errors"]["patient_id"], "This field is required");
}

#[test]
fn unusable_patient_reference_is_a_field_error() {
    let mut value = general_history();
    value["selected_patient"] = json!({ "id": true, "name": "Ana Ruiz" });
    let mut session = medical_history_session(value);

    assert!(!session.go_next());
    assert_eq!(session.current_step().id(), "basic_info");
    assert_eq!(
        session.errors().get("patient_id"),
        Some("Must be a valid identifier")
    );
    assert_eq!(session.submit_error(), None);

    session.update_field(object(json!({ "patient_id": "p-17" })));
    assert!(session.errors().is_empty());
    assert!(session.go_next());
}

#[test]
fn unknown_form_is_an_error() {
    let result = WizardSession::for_form("booking", SubmitMode::Create, Draft::new());
    assert!(matches!(
        result,
        Err(WizardError::Form(FormError::UnknownForm(ref id))) if id == "booking"
    ));
}
