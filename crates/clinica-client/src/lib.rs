//! clinica-client
//!
//! Host-side access to the clinic backend: the REST implementation of the
//! wizard's record store, schedule lookups and the on-disk client config.
//! HTTP calls are blocking (`ureq`) and are moved onto tokio's blocking
//! pool where an async caller needs them.

pub mod client;
pub mod config;
pub mod error;
pub mod records;
pub mod schedules;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use records::RestRecordStore;
