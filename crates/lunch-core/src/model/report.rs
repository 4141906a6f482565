use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline numbers shown to staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_students: i64,
    pub total_meals: i64,
    /// Non-cancelled transactions, all dates
    pub total_orders: i64,
    /// Non-cancelled transactions dated today
    pub orders_today: i64,
    /// Mean of per-meal averages over rated meals; `None` when nothing is rated
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularMeal {
    pub meal_id: i64,
    pub name: String,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub order_count: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentActivity {
    pub student_id: i64,
    pub name: String,
    pub order_count: i64,
    pub total_spent: f64,
}
