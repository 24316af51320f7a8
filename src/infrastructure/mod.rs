//! Infrastructure layer: settings, logging, storage and notices.

pub mod config;
pub mod logging;
pub mod notify;
pub mod storage;
