pub mod init;
pub mod meal;
pub mod menu;
pub mod order;
pub mod record;
pub mod report;
pub mod student;

use chrono::{Local, NaiveDate};
use lunch_core::model::{Meal, Student};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// clap value parser for `YYYY-MM-DD` dates
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    lunch_core::rules::parse_date(value).map_err(|e| e.to_string())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_meal(meal: &Meal) -> String {
    let summary = meal.rating_summary();
    let rating = if summary.is_rated() {
        format!("{:.1} ({})", summary.display_average(), summary.count)
    } else {
        "unrated".to_string()
    };
    format!(
        "{:>4}  {:<28} {:>7.2}  {:<10} {}",
        meal.id,
        meal.name,
        meal.price,
        meal.category.as_deref().unwrap_or("-"),
        rating
    )
}

pub fn format_student(student: &Student) -> String {
    format!(
        "{:>4}  {:<28} grade {:<4} class {}",
        student.id,
        student.name,
        student.grade.as_deref().unwrap_or("-"),
        student.class.as_deref().unwrap_or("-")
    )
}
