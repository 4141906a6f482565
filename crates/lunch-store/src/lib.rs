//! Lunch Store - SQLite persistence for the school lunch system
//!
//! Provides:
//! - SQLite schema with migrations framework
//! - `Database` handle with a per-thread connection cache
//! - Repositories for records, students, meals, orders, ratings and reports
//! - JSON menu import and starter data

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;

// Re-export key types
pub use db::Database;
pub use errors::Result;
pub use repo::{MealRepo, OrderRepo, RatingRepo, RecordRepo, ReportRepo, StudentRepo};
