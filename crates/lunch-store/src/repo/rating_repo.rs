//! Meal ratings
//!
//! Every score is kept in `ratings`; the running average on `meals` is
//! folded forward from the stored summary rather than recomputed.

use crate::errors::{from_rusqlite, Result};
use crate::repo::sql::{now_timestamp, timestamp_to_datetime};
use crate::repo::{MealRepo, StudentRepo};
use lunch_core::errors::LunchError;
use lunch_core::model::MealRating;
use lunch_core::rating::{RatingSummary, Score};
use rusqlite::{params, Connection, Row};

fn map_rating(row: &Row<'_>) -> rusqlite::Result<MealRating> {
    Ok(MealRating {
        id: row.get(0)?,
        meal_id: row.get(1)?,
        student_id: row.get(2)?,
        score: row.get(3)?,
        comment: row.get(4)?,
        created_at: timestamp_to_datetime(row.get(5)?),
    })
}

pub struct RatingRepo;

impl RatingRepo {
    /// Add one score to a meal and return the new summary.
    ///
    /// Reads, updates and inserts on the same connection; callers wrap it in
    /// a transaction so concurrent raters can't lose each other's scores.
    pub fn rate_meal(
        conn: &Connection,
        meal_id: i64,
        score: Score,
        student_id: Option<i64>,
        comment: Option<&str>,
    ) -> Result<RatingSummary> {
        let current = MealRepo::get_rating_summary(conn, meal_id)?
            .ok_or(LunchError::MealNotFound { meal_id })?;
        if let Some(student_id) = student_id {
            if !StudentRepo::exists(conn, student_id)? {
                return Err(LunchError::StudentNotFound { student_id }.into());
            }
        }

        let updated = current.apply(score);
        MealRepo::set_rating_summary(conn, meal_id, updated)?;
        conn.execute(
            "INSERT INTO ratings (meal_id, student_id, score, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![meal_id, student_id, score.value(), comment, now_timestamp()],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(
            meal_id,
            average = updated.average,
            count = updated.count,
            "meal rated"
        );
        Ok(updated)
    }

    /// Individual scores of a meal, newest first
    pub fn get_meal_ratings(conn: &Connection, meal_id: i64) -> Result<Vec<MealRating>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, meal_id, student_id, score, comment, created_at
                 FROM ratings WHERE meal_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(from_rusqlite)?;
        let ratings = stmt
            .query_map([meal_id], map_rating)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(ratings)
    }
}
