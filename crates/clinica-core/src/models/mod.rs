//! Persistence payloads: the exact shapes the clinic backend accepts.

pub mod medical_history;
pub mod patient;
pub mod specialty;
pub mod vital_signs;
