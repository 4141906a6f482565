//! Repository layer
//!
//! Each repository is a set of associated functions over a `&Connection`.
//! A `rusqlite::Transaction` derefs to a connection, so callers decide the
//! transaction boundary.

mod sql;

pub mod meal_repo;
pub mod order_repo;
pub mod rating_repo;
pub mod record_repo;
pub mod report_repo;
pub mod student_repo;

pub use meal_repo::MealRepo;
pub use order_repo::OrderRepo;
pub use rating_repo::RatingRepo;
pub use record_repo::RecordRepo;
pub use report_repo::ReportRepo;
pub use student_repo::StudentRepo;
