//! Domain layer for pr-to-task
//!
//! Pull-request records, settings, errors and the capability traits the
//! sync depends on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{SyncError, SyncResult};
