//! clinica-audit
//!
//! Application-level audit events for record changes, emitted through
//! `tracing` so they land in whatever sink the host installed.

pub mod events;
