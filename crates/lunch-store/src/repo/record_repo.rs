//! Generic record store
//!
//! Plain CRUD over the `records` table plus substring search.

use crate::errors::{from_rusqlite, Result};
use crate::repo::sql::{contains_pattern, now_timestamp, timestamp_to_datetime, update_statement};
use lunch_core::model::{NewRecord, Record, RecordPatch};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const SELECT_RECORD: &str = "SELECT id, name, value, example_field, created_at FROM records";

fn map_record(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        name: row.get(1)?,
        value: row.get(2)?,
        example_field: row.get(3)?,
        created_at: timestamp_to_datetime(row.get(4)?),
    })
}

pub struct RecordRepo;

impl RecordRepo {
    /// Insert a record and return its id
    pub fn add_record(conn: &Connection, record: &NewRecord) -> Result<i64> {
        conn.execute(
            "INSERT INTO records (name, value, example_field, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.name,
                record.value,
                record.example_field,
                now_timestamp()
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_record(conn: &Connection, id: i64) -> Result<Option<Record>> {
        conn.query_row(&format!("{} WHERE id = ?1", SELECT_RECORD), [id], map_record)
            .optional()
            .map_err(from_rusqlite)
    }

    pub fn get_all_records(conn: &Connection) -> Result<Vec<Record>> {
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY id", SELECT_RECORD))
            .map_err(from_rusqlite)?;
        let records = stmt
            .query_map([], map_record)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(records)
    }

    /// Apply a patch. Returns `false` if the record doesn't exist or the
    /// patch sets nothing.
    pub fn update_record(conn: &Connection, id: i64, patch: &RecordPatch) -> Result<bool> {
        let Some((sql, values)) = update_statement(patch, id) else {
            return Ok(false);
        };
        let changed = conn
            .execute(&sql, params_from_iter(values))
            .map_err(from_rusqlite)?;
        Ok(changed > 0)
    }

    /// Returns `false` if the record doesn't exist
    pub fn delete_record(conn: &Connection, id: i64) -> Result<bool> {
        let changed = conn
            .execute("DELETE FROM records WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        Ok(changed > 0)
    }

    /// Records whose name, value or example_field contains `term`
    /// (ASCII case-insensitive). The empty term matches every record.
    pub fn search_records(conn: &Connection, term: &str) -> Result<Vec<Record>> {
        let mut stmt = conn
            .prepare(&format!(
                "{} WHERE name LIKE ?1 ESCAPE '\\'
                    OR value LIKE ?1 ESCAPE '\\'
                    OR example_field LIKE ?1 ESCAPE '\\'
                 ORDER BY id",
                SELECT_RECORD
            ))
            .map_err(from_rusqlite)?;
        let records = stmt
            .query_map([contains_pattern(term)], map_record)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(records)
    }

    pub fn get_record_count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}
