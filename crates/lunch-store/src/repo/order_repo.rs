//! Meal purchases (the `transactions` table)

use crate::errors::{from_rusqlite, Result};
use crate::repo::sql::{date_column, date_to_sql, now_timestamp, timestamp_to_datetime};
use crate::repo::{MealRepo, StudentRepo};
use chrono::NaiveDate;
use lunch_core::errors::LunchError;
use lunch_core::model::{OrderStatus, StudentOrder, Transaction};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_TRANSACTION: &str = "SELECT t.id, t.student_id, t.meal_id, t.date,
        t.external_transaction_id, t.status, t.created_at
     FROM transactions t";

fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let status: String = row.get(5)?;
    let status = status
        .parse::<OrderStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: row.get(0)?,
        student_id: row.get(1)?,
        meal_id: row.get(2)?,
        date: date_column(row, 3)?,
        external_transaction_id: row.get(4)?,
        status,
        created_at: timestamp_to_datetime(row.get(6)?),
    })
}

fn query_transactions(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params, map_transaction)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

pub struct OrderRepo;

impl OrderRepo {
    /// Record one completed purchase. Student and meal must exist.
    pub fn record_transaction(
        conn: &Connection,
        student_id: i64,
        meal_id: i64,
        date: NaiveDate,
    ) -> Result<i64> {
        Self::record_transaction_with(conn, student_id, meal_id, date, None, OrderStatus::Completed)
    }

    pub fn record_transaction_with(
        conn: &Connection,
        student_id: i64,
        meal_id: i64,
        date: NaiveDate,
        external_transaction_id: Option<&str>,
        status: OrderStatus,
    ) -> Result<i64> {
        if !StudentRepo::exists(conn, student_id)? {
            return Err(LunchError::StudentNotFound { student_id }.into());
        }
        if !MealRepo::exists(conn, meal_id)? {
            return Err(LunchError::MealNotFound { meal_id }.into());
        }
        conn.execute(
            "INSERT INTO transactions
                (student_id, meal_id, date, external_transaction_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                student_id,
                meal_id,
                date_to_sql(date),
                external_transaction_id,
                status.as_str(),
                now_timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Record one transaction per meal id, in the given order.
    ///
    /// Not atomic by itself: run it inside a transaction so that an unknown
    /// meal halfway through leaves nothing behind.
    pub fn place_order(
        conn: &Connection,
        student_id: i64,
        meal_ids: &[i64],
        date: NaiveDate,
    ) -> Result<Vec<i64>> {
        if meal_ids.is_empty() {
            return Err(LunchError::EmptyOrder.into());
        }
        meal_ids
            .iter()
            .map(|meal_id| Self::record_transaction(conn, student_id, *meal_id, date))
            .collect()
    }

    pub fn get_transaction(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
        conn.query_row(
            &format!("{} WHERE t.id = ?1", SELECT_TRANSACTION),
            [id],
            map_transaction,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Order history of one student, newest date first
    pub fn get_student_transactions(conn: &Connection, student_id: i64) -> Result<Vec<StudentOrder>> {
        let mut stmt = conn
            .prepare(
                "SELECT t.id, t.student_id, t.meal_id, t.date,
                        t.external_transaction_id, t.status, t.created_at,
                        m.name, m.price
                 FROM transactions t
                 JOIN meals m ON m.id = t.meal_id
                 WHERE t.student_id = ?1
                 ORDER BY t.date DESC, t.id DESC",
            )
            .map_err(from_rusqlite)?;
        let orders = stmt
            .query_map([student_id], |row| {
                Ok(StudentOrder {
                    transaction: map_transaction(row)?,
                    meal_name: row.get(7)?,
                    price: row.get(8)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(orders)
    }

    /// Every transaction dated `date`, cancelled ones included
    pub fn get_daily_transactions(conn: &Connection, date: NaiveDate) -> Result<Vec<Transaction>> {
        query_transactions(
            conn,
            &format!("{} WHERE t.date = ?1 ORDER BY t.id", SELECT_TRANSACTION),
            [date_to_sql(date)],
        )
    }

    /// Mark a transaction cancelled. Returns `false` if it doesn't exist or
    /// is already cancelled.
    pub fn cancel_transaction(conn: &Connection, id: i64) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE transactions SET status = ?1 WHERE id = ?2 AND status != ?1",
                params![OrderStatus::Cancelled.as_str(), id],
            )
            .map_err(from_rusqlite)?;
        Ok(changed > 0)
    }
}
