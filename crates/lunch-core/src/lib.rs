//! Lunch Core - domain kernel of the school lunch system
//!
//! Provides:
//! - Student, meal, order, rating and generic record models
//! - Rating aggregation (weighted running average)
//! - Input validation rules
//! - Menu documents and the starter menu
//! - Error facility (`LunchError` -> `ExError`) and structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod menu;
pub mod model;
pub mod rating;
pub mod rules;
pub mod schema;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, LunchError, Result};
pub use model::{
    DailySales, Meal, MealPatch, MealRating, NewMeal, NewRecord, NewStudent, OrderStatus, Patch,
    PopularMeal, Record, RecordPatch, ScheduledMeal, Statistics, Student, StudentActivity,
    StudentOrder, StudentPatch, Transaction,
};
pub use rating::{apply_rating, RatingSummary, Score};
