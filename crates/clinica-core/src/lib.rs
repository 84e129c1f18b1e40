//! clinica-core
//!
//! Pure domain types shared by the wizard engine and its hosts: the draft
//! record, field-level error maps, entity kinds, persistence payloads and
//! REST path conventions. No I/O lives here.

pub mod draft;
pub mod entity;
pub mod error;
pub mod error_map;
pub mod models;
pub mod routes;

pub use draft::Draft;
pub use entity::{EntityKind, RecordType};
pub use error_map::ErrorMap;
