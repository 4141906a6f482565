//! SQL building blocks shared by the repositories

use chrono::{DateTime, NaiveDate, Utc};
use lunch_core::model::{FieldValue, Patch};
use lunch_core::rules::validation::DATE_FORMAT;
use rusqlite::types::{Type, Value};

/// Seconds since the epoch, the stored form of `created_at`
pub(crate) fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Read a `YYYY-MM-DD` column, surfacing bad text as a conversion error
pub(crate) fn date_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// `LIKE` pattern matching `term` anywhere in a column, with `%`, `_` and
/// the escape character itself taken literally. Pair with `ESCAPE '\'`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `UPDATE <table> SET ... WHERE id = ?N` for the columns a patch sets.
///
/// Column names come from the patch's fixed column list; values are bound.
/// Returns `None` for an empty patch.
pub(crate) fn update_statement<P: Patch>(patch: &P, id: i64) -> Option<(String, Vec<Value>)> {
    let assignments = patch.assignments();
    if assignments.is_empty() {
        return None;
    }

    let mut set_clauses = Vec::with_capacity(assignments.len());
    let mut params = Vec::with_capacity(assignments.len() + 1);
    for (i, (column, value)) in assignments.into_iter().enumerate() {
        set_clauses.push(format!("{} = ?{}", column, i + 1));
        params.push(match value {
            FieldValue::Text(text) => Value::Text(text),
            FieldValue::Real(real) => Value::Real(real),
        });
    }
    params.push(Value::Integer(id));

    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        P::TABLE,
        set_clauses.join(", "),
        params.len()
    );
    Some((sql, params))
}
