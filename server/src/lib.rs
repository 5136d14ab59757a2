//! Taskboard server binary support crate
//!
//! Exposes configuration, telemetry and setup so integration tests can
//! assemble the application the same way the binary does.

pub mod config;
pub mod setup;
pub mod telemetry;
