//! REST path conventions.
//!
//! Pure string functions. These define where each entity kind lives on the
//! clinic backend, relative to the configured base URL.

use crate::entity::EntityKind;

pub fn collection(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::MedicalHistory => "medical-histories",
        EntityKind::Patient => "patients",
    }
}

pub fn record(kind: EntityKind, id: &str) -> String {
    format!("{}/{id}", collection(kind))
}

pub fn doctor_schedule(doctor_id: &str) -> String {
    format!("doctors/{doctor_id}/schedule")
}

pub fn doctor_appointments(doctor_id: &str) -> String {
    format!("doctors/{doctor_id}/appointments")
}
