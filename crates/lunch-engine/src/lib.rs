//! Lunch Engine - Orchestration layer
//!
//! Coordinates lunch-core domain rules with lunch-store persistence, and
//! wraps every operation in structured start/end logging.

pub mod commands;

pub use commands::engine_command::{apply_command, LunchCommand, LunchCommandResult};
pub use commands::engine_query::{apply_query, LunchQuery, LunchQueryResult};
pub use commands::reports::{run_report, Report, ReportResult};
