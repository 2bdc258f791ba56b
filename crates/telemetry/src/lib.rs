//! Tracing setup for the commerce analytics engine.
//!
//! The library crates emit structured events (merge milestones, exclusion
//! warnings, per-query debug lines); embedding applications pick the
//! subscriber format here.

pub mod tracing_setup;

pub use tracing_setup::*;
