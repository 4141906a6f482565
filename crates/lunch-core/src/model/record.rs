use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{resolve_column, FieldValue, Patch};
use crate::errors::Result;

/// A row of the generic record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub value: Option<String>,
    pub example_field: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values for a record insert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub value: Option<String>,
    pub example_field: Option<String>,
}

impl NewRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_example_field(mut self, example_field: impl Into<String>) -> Self {
        self.example_field = Some(example_field.into());
        self
    }
}

/// Partial update of a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub value: Option<String>,
    pub example_field: Option<String>,
}

impl RecordPatch {
    pub const COLUMNS: &'static [&'static str] = &["name", "value", "example_field"];

    /// Build a patch from `(column, value)` pairs.
    ///
    /// Fails with `UnknownColumn` on the first name outside `COLUMNS`, so a
    /// bad pair never results in a partial update.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut patch = Self::default();
        for (column, value) in pairs {
            match resolve_column(Self::TABLE, Self::COLUMNS, column.as_ref())? {
                "name" => patch.name = Some(value.into()),
                "value" => patch.value = Some(value.into()),
                _ => patch.example_field = Some(value.into()),
            }
        }
        Ok(patch)
    }
}

impl Patch for RecordPatch {
    const TABLE: &'static str = "records";

    fn assignments(&self) -> Vec<(&'static str, FieldValue)> {
        let mut out = Vec::new();
        if let Some(name) = &self.name {
            out.push(("name", FieldValue::Text(name.clone())));
        }
        if let Some(value) = &self.value {
            out.push(("value", FieldValue::Text(value.clone())));
        }
        if let Some(example_field) = &self.example_field {
            out.push(("example_field", FieldValue::Text(example_field.clone())));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LunchError;

    #[test]
    fn test_from_pairs_sets_known_columns() {
        let patch = RecordPatch::from_pairs([("value", "69"), ("example_field", "dev")]).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.value.as_deref(), Some("69"));
        assert_eq!(patch.assignments().len(), 2);
    }

    #[test]
    fn test_from_pairs_rejects_unknown_column() {
        let err = RecordPatch::from_pairs([("value", "1"), ("invalid_field", "x")]).unwrap_err();
        assert_eq!(
            err,
            LunchError::UnknownColumn {
                table: "records".to_string(),
                column: "invalid_field".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_patch() {
        assert!(RecordPatch::default().is_empty());
    }
}
