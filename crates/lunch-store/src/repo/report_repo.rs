//! Aggregate queries for staff statistics and reports
//!
//! Cancelled transactions never count as orders here.

use crate::errors::{from_rusqlite, Result};
use crate::repo::sql::{date_to_sql, timestamp_to_datetime};
use chrono::NaiveDate;
use lunch_core::model::{DailySales, Meal, PopularMeal, Statistics, StudentActivity};
use rusqlite::{params, Connection};

const NOT_CANCELLED: &str = "status != 'cancelled'";

pub struct ReportRepo;

impl ReportRepo {
    pub fn statistics(conn: &Connection, today: NaiveDate) -> Result<Statistics> {
        conn.query_row(
            &format!(
                "SELECT
                    (SELECT COUNT(*) FROM students),
                    (SELECT COUNT(*) FROM meals),
                    (SELECT COUNT(*) FROM transactions WHERE {nc}),
                    (SELECT COUNT(*) FROM transactions WHERE {nc} AND date = ?1),
                    (SELECT AVG(rating) FROM meals WHERE rating_count > 0)",
                nc = NOT_CANCELLED
            ),
            [date_to_sql(today)],
            |row| {
                Ok(Statistics {
                    total_students: row.get(0)?,
                    total_meals: row.get(1)?,
                    total_orders: row.get(2)?,
                    orders_today: row.get(3)?,
                    average_rating: row.get(4)?,
                })
            },
        )
        .map_err(from_rusqlite)
    }

    /// Meals by number of orders, most ordered first. Meals never ordered
    /// are left out.
    pub fn popular_meals(conn: &Connection, limit: usize) -> Result<Vec<PopularMeal>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT m.id, m.name, COUNT(t.id) AS orders
                 FROM transactions t
                 JOIN meals m ON m.id = t.meal_id
                 WHERE t.{}
                 GROUP BY m.id
                 ORDER BY orders DESC, m.name, m.id
                 LIMIT ?1",
                NOT_CANCELLED
            ))
            .map_err(from_rusqlite)?;
        let meals = stmt
            .query_map([limit as i64], |row| {
                Ok(PopularMeal {
                    meal_id: row.get(0)?,
                    name: row.get(1)?,
                    order_count: row.get(2)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(meals)
    }

    /// Orders and revenue for one date, at current meal prices
    pub fn daily_sales(conn: &Connection, date: NaiveDate) -> Result<DailySales> {
        let (order_count, revenue) = conn
            .query_row(
                &format!(
                    "SELECT COUNT(t.id), COALESCE(SUM(m.price), 0.0)
                     FROM transactions t
                     JOIN meals m ON m.id = t.meal_id
                     WHERE t.date = ?1 AND t.{}",
                    NOT_CANCELLED
                ),
                params![date_to_sql(date)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(from_rusqlite)?;
        Ok(DailySales {
            date,
            order_count,
            revenue,
        })
    }

    /// Every student with their order count and spend, busiest first.
    /// Students without orders appear with zeroes.
    pub fn student_activity(conn: &Connection) -> Result<Vec<StudentActivity>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT s.id, s.name, COUNT(t.id) AS orders, COALESCE(SUM(m.price), 0.0)
                 FROM students s
                 LEFT JOIN transactions t ON t.student_id = s.id AND t.{}
                 LEFT JOIN meals m ON m.id = t.meal_id
                 GROUP BY s.id
                 ORDER BY orders DESC, s.name, s.id",
                NOT_CANCELLED
            ))
            .map_err(from_rusqlite)?;
        let activity = stmt
            .query_map([], |row| {
                Ok(StudentActivity {
                    student_id: row.get(0)?,
                    name: row.get(1)?,
                    order_count: row.get(2)?,
                    total_spent: row.get(3)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(activity)
    }

    /// Rated meals by average, best first; ties go to the meal with more scores
    pub fn top_rated(conn: &Connection, limit: usize) -> Result<Vec<Meal>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, name, description, price, category, rating, rating_count, created_at
                 FROM meals
                 WHERE rating_count > 0
                 ORDER BY rating DESC, rating_count DESC, name
                 LIMIT ?1",
            )
            .map_err(from_rusqlite)?;
        let meals = stmt
            .query_map([limit as i64], |row| {
                Ok(Meal {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    price: row.get(3)?,
                    category: row.get(4)?,
                    rating: row.get(5)?,
                    rating_count: row.get(6)?,
                    created_at: timestamp_to_datetime(row.get(7)?),
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(meals)
    }
}
