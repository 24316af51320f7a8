//! Adapters to external systems.

pub mod github;
