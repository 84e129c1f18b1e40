#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use clinica_core::{Draft, EntityKind};
use clinica_forms::{FieldSpec, FormDefinition, InputKind, StepDescriptor};
use clinica_wizard::store::BoxFuture;
use clinica_wizard::{RecordStore, StoreRejection, SubmitMode, WizardSession};
use serde_json::{Map, Value, json};
use tokio::sync::Notify;

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

pub fn general_history() -> Value {
    json!({
        "selected_patient": { "id": "p-17", "name": "Ana Ruiz", "age": 34 },
        "type": "general",
        "visit_date": "2026-10-14",
        "doctor_id": "d-3",
        "chief_complaint": "Persistent cough",
        "vital_signs": {
            "blood_pressure_systolic": "118",
            "blood_pressure_diastolic": 76,
            "heart_rate": 72,
            "temperature": 37.2
        },
        "allergies": ["penicillin"],
        "diagnosis": "Acute bronchitis",
        "treatment_plan": "Rest and fluids"
    })
}

pub fn medical_history_session(draft: Value) -> WizardSession {
    WizardSession::for_form(
        "medical_history",
        SubmitMode::Create,
        Draft::from_value(draft).unwrap(),
    )
    .unwrap()
}

/// A general medical history session already sitting on the review step.
pub fn session_on_review() -> WizardSession {
    let mut session = medical_history_session(general_history());
    while !session.is_on_last_step() {
        assert!(session.go_next(), "errors: {:?}", session.errors());
    }
    session
}

/// A medical history session on a form that only asks for notes, sitting
/// on its review step. Its draft validates but cannot be mapped to a
/// payload.
pub fn unmappable_session_on_review() -> WizardSession {
    let form = FormDefinition::builder("notes_only", "Notes", EntityKind::MedicalHistory)
        .step(StepDescriptor::new(
            "notes",
            "Notes",
            vec![FieldSpec::new("notes", "Notes", InputKind::TextArea).required()],
        ))
        .build()
        .unwrap();
    let mut session = WizardSession::new(
        Arc::new(form),
        SubmitMode::Create,
        Draft::from_value(json!({ "notes": "follow up" })).unwrap(),
    );
    assert!(session.go_next());
    assert!(session.is_on_last_step());
    session
}

/// Store whose calls block until `release` is notified.
pub struct GatedStore {
    pub calls: AtomicUsize,
    pub release: Notify,
    pub outcome: Result<Option<Value>, StoreRejection>,
    pub last_payload: Mutex<Option<(EntityKind, Option<String>, Value)>>,
}

impl GatedStore {
    pub fn new(outcome: Result<Option<Value>, StoreRejection>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            release: Notify::new(),
            outcome,
            last_payload: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(
        &self,
        kind: EntityKind,
        id: Option<String>,
        payload: Value,
    ) -> BoxFuture<'_, Result<Option<Value>, StoreRejection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some((kind, id, payload));
        Box::pin(async move {
            self.release.notified().await;
            self.outcome.clone()
        })
    }
}

impl RecordStore for GatedStore {
    fn create(
        &self,
        kind: EntityKind,
        payload: Value,
    ) -> BoxFuture<'_, Result<Option<Value>, StoreRejection>> {
        self.record(kind, None, payload)
    }

    fn update(
        &self,
        kind: EntityKind,
        id: String,
        payload: Value,
    ) -> BoxFuture<'_, Result<Option<Value>, StoreRejection>> {
        self.record(kind, Some(id), payload)
    }
}
