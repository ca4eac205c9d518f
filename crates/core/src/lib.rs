//! synchron-core
//!
//! Core library for the Synchron OS module orchestrator.
//!
//! This crate defines the ritual grammar and its validator, the module
//! directory model, the lifecycle orchestrator, the registry scanner, and
//! the integrity verifier.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, dashboards, etc.). The filesystem
//! is the authoritative store: nothing in this crate caches state across
//! calls, and the registry is always rebuilt by scanning.

pub mod config;
pub mod integrity;
pub mod layout;
pub mod lifecycle;
pub mod model;
pub mod registry;
pub mod ritual;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
