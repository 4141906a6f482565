use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One score given to a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRating {
    pub id: i64,
    pub meal_id: i64,
    /// Absent for anonymous ratings
    pub student_id: Option<i64>,
    pub score: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
