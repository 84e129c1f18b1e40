pub mod medical_history;
pub mod patient;
