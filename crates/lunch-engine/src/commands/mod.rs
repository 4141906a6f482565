//! Command orchestration layer.
//!
//! Writes go through `apply_command`, lookups through `apply_query` and
//! staff reports through `run_report`.

pub mod engine_command;
pub mod engine_query;
pub mod reports;
