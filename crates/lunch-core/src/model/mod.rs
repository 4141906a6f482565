pub mod meal;
pub mod order;
pub mod rating;
pub mod record;
pub mod report;
pub mod student;

pub use meal::{Meal, MealPatch, NewMeal, ScheduledMeal};
pub use order::{OrderStatus, StudentOrder, Transaction};
pub use rating::MealRating;
pub use record::{NewRecord, Record, RecordPatch};
pub use report::{DailySales, PopularMeal, Statistics, StudentActivity};
pub use student::{NewStudent, Student, StudentPatch};

/// A column value carried by a patch, independent of the storage driver
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Real(f64),
}

/// A partial update to one row of a table
///
/// Only the columns a patch sets are written; an empty patch writes nothing.
pub trait Patch {
    /// Table the patch applies to
    const TABLE: &'static str;

    /// `(column, value)` pairs to assign, in column order
    fn assignments(&self) -> Vec<(&'static str, FieldValue)>;

    fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }
}

/// Resolve a user-supplied column name against the columns a table allows.
pub(crate) fn resolve_column(
    table: &str,
    allowed: &[&'static str],
    column: &str,
) -> crate::errors::Result<&'static str> {
    allowed
        .iter()
        .copied()
        .find(|c| *c == column)
        .ok_or_else(|| crate::errors::LunchError::UnknownColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
}
