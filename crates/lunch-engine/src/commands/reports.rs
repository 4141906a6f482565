//! Staff statistics and reports.
//!
//! Reports are read-only like queries, but also know how to render
//! themselves as the plain-text tables the CLI prints.

use std::fmt;
use std::time::Instant;

use chrono::NaiveDate;
use lunch_core::model::{DailySales, Meal, PopularMeal, Statistics, StudentActivity};
use lunch_core::{log_op_end, log_op_error, log_op_start};
use lunch_store::errors::Result;
use lunch_store::{Database, ReportRepo};

/// Default row limit for ranked reports
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Headline numbers; `today` decides which orders count as today's.
    Statistics { today: NaiveDate },
    PopularMeals { limit: usize },
    DailySales { date: NaiveDate },
    StudentActivity,
    TopRated { limit: usize },
}

impl Report {
    pub fn op_name(&self) -> &'static str {
        match self {
            Report::Statistics { .. } => "report_statistics",
            Report::PopularMeals { .. } => "report_popular_meals",
            Report::DailySales { .. } => "report_daily_sales",
            Report::StudentActivity => "report_student_activity",
            Report::TopRated { .. } => "report_top_rated",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportResult {
    Statistics(Statistics),
    PopularMeals(Vec<PopularMeal>),
    DailySales(DailySales),
    StudentActivity(Vec<StudentActivity>),
    TopRated(Vec<Meal>),
}

pub fn run_report(report: Report, db: &Database) -> Result<ReportResult> {
    let op = report.op_name();
    log_op_start!(op);
    let start = Instant::now();

    let result = db.with_conn(|conn| match report {
        Report::Statistics { today } => {
            ReportRepo::statistics(conn, today).map(ReportResult::Statistics)
        }
        Report::PopularMeals { limit } => {
            ReportRepo::popular_meals(conn, limit).map(ReportResult::PopularMeals)
        }
        Report::DailySales { date } => {
            ReportRepo::daily_sales(conn, date).map(ReportResult::DailySales)
        }
        Report::StudentActivity => {
            ReportRepo::student_activity(conn).map(ReportResult::StudentActivity)
        }
        Report::TopRated { limit } => ReportRepo::top_rated(conn, limit).map(ReportResult::TopRated),
    });

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = elapsed);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = elapsed);
        }
    }
    result
}

impl fmt::Display for ReportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportResult::Statistics(stats) => {
                writeln!(f, "Students:      {}", stats.total_students)?;
                writeln!(f, "Meals:         {}", stats.total_meals)?;
                writeln!(f, "Orders:        {}", stats.total_orders)?;
                writeln!(f, "Orders today:  {}", stats.orders_today)?;
                match stats.average_rating {
                    Some(avg) => writeln!(f, "Avg rating:    {:.1}", avg),
                    None => writeln!(f, "Avg rating:    -"),
                }
            }
            ReportResult::PopularMeals(meals) => {
                if meals.is_empty() {
                    return writeln!(f, "No orders yet.");
                }
                for (rank, meal) in meals.iter().enumerate() {
                    writeln!(
                        f,
                        "{:>2}. {:<30} {:>5} orders",
                        rank + 1,
                        meal.name,
                        meal.order_count
                    )?;
                }
                Ok(())
            }
            ReportResult::DailySales(sales) => writeln!(
                f,
                "{}: {} orders, revenue {:.2}",
                sales.date, sales.order_count, sales.revenue
            ),
            ReportResult::StudentActivity(rows) => {
                if rows.is_empty() {
                    return writeln!(f, "No students registered.");
                }
                for row in rows {
                    writeln!(
                        f,
                        "{:<30} {:>5} orders {:>10.2}",
                        row.name, row.order_count, row.total_spent
                    )?;
                }
                Ok(())
            }
            ReportResult::TopRated(meals) => {
                if meals.is_empty() {
                    return writeln!(f, "No rated meals yet.");
                }
                for (rank, meal) in meals.iter().enumerate() {
                    let summary = meal.rating_summary();
                    writeln!(
                        f,
                        "{:>2}. {:<30} {:.1} ({} ratings)",
                        rank + 1,
                        meal.name,
                        summary.display_average(),
                        summary.count
                    )?;
                }
                Ok(())
            }
        }
    }
}
