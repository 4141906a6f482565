//! Meal and meal schedule persistence

use crate::errors::{from_rusqlite, Result};
use crate::repo::sql::{
    contains_pattern, date_column, date_to_sql, now_timestamp, timestamp_to_datetime,
    update_statement,
};
use chrono::NaiveDate;
use lunch_core::errors::LunchError;
use lunch_core::model::{Meal, MealPatch, NewMeal, ScheduledMeal};
use lunch_core::rating::RatingSummary;
use lunch_core::rules::{validate_meal_patch, validate_new_meal, validate_quantity};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const SELECT_MEAL: &str =
    "SELECT id, name, description, price, category, rating, rating_count, created_at FROM meals";

fn map_meal(row: &Row<'_>) -> rusqlite::Result<Meal> {
    map_meal_at(row, 0)
}

/// Map the eight meal columns starting at `offset`
fn map_meal_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Meal> {
    Ok(Meal {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        description: row.get(offset + 2)?,
        price: row.get(offset + 3)?,
        category: row.get(offset + 4)?,
        rating: row.get(offset + 5)?,
        rating_count: row.get(offset + 6)?,
        created_at: timestamp_to_datetime(row.get(offset + 7)?),
    })
}

fn query_meals(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Meal>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let meals = stmt
        .query_map(params, map_meal)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(meals)
}

pub struct MealRepo;

impl MealRepo {
    pub fn add_meal(conn: &Connection, meal: &NewMeal) -> Result<i64> {
        let meal = validate_new_meal(meal)?;
        conn.execute(
            "INSERT INTO meals (name, description, price, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                meal.name,
                meal.description,
                meal.price,
                meal.category,
                now_timestamp()
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns `false` if the meal doesn't exist or the patch sets nothing.
    /// Ratings are not patchable; they change only through rating.
    pub fn update_meal(conn: &Connection, id: i64, patch: &MealPatch) -> Result<bool> {
        let patch = validate_meal_patch(patch)?;
        let Some((sql, values)) = update_statement(&patch, id) else {
            return Ok(false);
        };
        let changed = conn
            .execute(&sql, params_from_iter(values))
            .map_err(from_rusqlite)?;
        Ok(changed > 0)
    }

    pub fn get_meal(conn: &Connection, id: i64) -> Result<Option<Meal>> {
        conn.query_row(&format!("{} WHERE id = ?1", SELECT_MEAL), [id], map_meal)
            .optional()
            .map_err(from_rusqlite)
    }

    pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
        conn.query_row("SELECT 1 FROM meals WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .map(|found| found.is_some())
            .map_err(from_rusqlite)
    }

    /// All meals ordered by name
    pub fn get_all_meals(conn: &Connection) -> Result<Vec<Meal>> {
        query_meals(conn, &format!("{} ORDER BY name, id", SELECT_MEAL), [])
    }

    pub fn get_meals_by_category(conn: &Connection, category: &str) -> Result<Vec<Meal>> {
        query_meals(
            conn,
            &format!(
                "{} WHERE LOWER(category) = LOWER(?1) ORDER BY name, id",
                SELECT_MEAL
            ),
            [category.trim()],
        )
    }

    /// Meals whose name, description or category contains `term`
    pub fn search_meals(conn: &Connection, term: &str) -> Result<Vec<Meal>> {
        query_meals(
            conn,
            &format!(
                "{} WHERE name LIKE ?1 ESCAPE '\\'
                    OR description LIKE ?1 ESCAPE '\\'
                    OR category LIKE ?1 ESCAPE '\\'
                 ORDER BY name, id",
                SELECT_MEAL
            ),
            [contains_pattern(term)],
        )
    }

    /// Exact lookup by name and category; a `None` category matches meals
    /// without one.
    pub fn find_meal(conn: &Connection, name: &str, category: Option<&str>) -> Result<Option<Meal>> {
        conn.query_row(
            &format!(
                "{} WHERE name = ?1 AND category IS ?2 ORDER BY id LIMIT 1",
                SELECT_MEAL
            ),
            params![name, category],
            map_meal,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn find_meal_by_name(conn: &Connection, name: &str) -> Result<Option<Meal>> {
        conn.query_row(
            &format!("{} WHERE name = ?1 ORDER BY id LIMIT 1", SELECT_MEAL),
            [name],
            map_meal,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn count_meals(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM meals", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }

    pub fn get_rating_summary(conn: &Connection, meal_id: i64) -> Result<Option<RatingSummary>> {
        conn.query_row(
            "SELECT rating, rating_count FROM meals WHERE id = ?1",
            [meal_id],
            |row| {
                Ok(RatingSummary {
                    average: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn set_rating_summary(conn: &Connection, meal_id: i64, summary: RatingSummary) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE meals SET rating = ?1, rating_count = ?2 WHERE id = ?3",
                params![summary.average, summary.count, meal_id],
            )
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return Err(LunchError::MealNotFound { meal_id }.into());
        }
        Ok(())
    }

    /// Put a meal on the menu for a date with a number of portions
    pub fn schedule_meal(
        conn: &Connection,
        meal_id: i64,
        date: NaiveDate,
        quantity: i64,
    ) -> Result<i64> {
        let quantity = validate_quantity(quantity)?;
        if !Self::exists(conn, meal_id)? {
            return Err(LunchError::MealNotFound { meal_id }.into());
        }
        conn.execute(
            "INSERT INTO meal_schedule (meal_id, date, available_quantity, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![meal_id, date_to_sql(date), quantity, now_timestamp()],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Meals scheduled for `date`, ordered by meal name
    pub fn get_meals_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<ScheduledMeal>> {
        let mut stmt = conn
            .prepare(
                "SELECT ms.id, ms.date, ms.available_quantity,
                        m.id, m.name, m.description, m.price, m.category,
                        m.rating, m.rating_count, m.created_at
                 FROM meal_schedule ms
                 JOIN meals m ON m.id = ms.meal_id
                 WHERE ms.date = ?1
                 ORDER BY m.name, ms.id",
            )
            .map_err(from_rusqlite)?;
        let scheduled = stmt
            .query_map([date_to_sql(date)], |row| {
                Ok(ScheduledMeal {
                    schedule_id: row.get(0)?,
                    date: date_column(row, 1)?,
                    available_quantity: row.get(2)?,
                    meal: map_meal_at(row, 3)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(scheduled)
    }
}
