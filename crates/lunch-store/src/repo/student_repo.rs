//! Student persistence

use crate::errors::{from_rusqlite, Result};
use crate::repo::sql::{contains_pattern, now_timestamp, timestamp_to_datetime, update_statement};
use lunch_core::model::{NewStudent, Student, StudentPatch};
use lunch_core::rules::{validate_new_student, validate_student_patch};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const SELECT_STUDENT: &str =
    "SELECT id, name, grade, class, allergies, external_account_id, created_at FROM students";

fn map_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        grade: row.get(2)?,
        class: row.get(3)?,
        allergies: row.get(4)?,
        external_account_id: row.get(5)?,
        created_at: timestamp_to_datetime(row.get(6)?),
    })
}

fn query_students(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Student>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let students = stmt
        .query_map(params, map_student)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(students)
}

pub struct StudentRepo;

impl StudentRepo {
    pub fn add_student(conn: &Connection, student: &NewStudent) -> Result<i64> {
        let student = validate_new_student(student)?;
        conn.execute(
            "INSERT INTO students (name, grade, class, allergies, external_account_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                student.name,
                student.grade,
                student.class,
                student.allergies,
                student.external_account_id,
                now_timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns `false` if the student doesn't exist or the patch sets nothing
    pub fn update_student(conn: &Connection, id: i64, patch: &StudentPatch) -> Result<bool> {
        let patch = validate_student_patch(patch)?;
        let Some((sql, values)) = update_statement(&patch, id) else {
            return Ok(false);
        };
        let changed = conn
            .execute(&sql, params_from_iter(values))
            .map_err(from_rusqlite)?;
        Ok(changed > 0)
    }

    pub fn get_student(conn: &Connection, id: i64) -> Result<Option<Student>> {
        conn.query_row(&format!("{} WHERE id = ?1", SELECT_STUDENT), [id], map_student)
            .optional()
            .map_err(from_rusqlite)
    }

    pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
        conn.query_row("SELECT 1 FROM students WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .map(|found| found.is_some())
            .map_err(from_rusqlite)
    }

    /// All students ordered by name
    pub fn get_all_students(conn: &Connection) -> Result<Vec<Student>> {
        query_students(conn, &format!("{} ORDER BY name, id", SELECT_STUDENT), [])
    }

    /// Students whose name, grade or class contains `term`
    pub fn search_students(conn: &Connection, term: &str) -> Result<Vec<Student>> {
        query_students(
            conn,
            &format!(
                "{} WHERE name LIKE ?1 ESCAPE '\\'
                    OR grade LIKE ?1 ESCAPE '\\'
                    OR class LIKE ?1 ESCAPE '\\'
                 ORDER BY name, id",
                SELECT_STUDENT
            ),
            [contains_pattern(term)],
        )
    }

    /// Case-insensitive exact name lookup used for login.
    ///
    /// Case folding is SQLite's `LOWER`, which only folds ASCII letters:
    /// "THANDI" finds "Thandi" but "åsa" does not find "Åsa". Surrounding
    /// whitespace is ignored. With duplicate names the earliest registered
    /// student wins.
    pub fn find_student_by_name(conn: &Connection, name: &str) -> Result<Option<Student>> {
        conn.query_row(
            &format!(
                "{} WHERE LOWER(name) = LOWER(?1) ORDER BY id LIMIT 1",
                SELECT_STUDENT
            ),
            [name.trim()],
            map_student,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn count_students(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}
