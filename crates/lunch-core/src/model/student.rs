use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{resolve_column, FieldValue, Patch};
use crate::errors::Result;

/// A registered student
///
/// Students log in by name; `name` is matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub grade: Option<String>,
    pub class: Option<String>,
    /// Comma-separated allergen list, as entered
    pub allergies: Option<String>,
    /// Reference into an external payment system
    pub external_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub grade: Option<String>,
    pub class: Option<String>,
    pub allergies: Option<String>,
    pub external_account_id: Option<String>,
}

impl NewStudent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_allergies(mut self, allergies: impl Into<String>) -> Self {
        self.allergies = Some(allergies.into());
        self
    }

    pub fn with_external_account_id(mut self, id: impl Into<String>) -> Self {
        self.external_account_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub class: Option<String>,
    pub allergies: Option<String>,
    pub external_account_id: Option<String>,
}

impl StudentPatch {
    pub const COLUMNS: &'static [&'static str] =
        &["name", "grade", "class", "allergies", "external_account_id"];

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut patch = Self::default();
        for (column, value) in pairs {
            let slot = match resolve_column(Self::TABLE, Self::COLUMNS, column.as_ref())? {
                "name" => &mut patch.name,
                "grade" => &mut patch.grade,
                "class" => &mut patch.class,
                "allergies" => &mut patch.allergies,
                _ => &mut patch.external_account_id,
            };
            *slot = Some(value.into());
        }
        Ok(patch)
    }
}

impl Patch for StudentPatch {
    const TABLE: &'static str = "students";

    fn assignments(&self) -> Vec<(&'static str, FieldValue)> {
        [
            ("name", &self.name),
            ("grade", &self.grade),
            ("class", &self.class),
            ("allergies", &self.allergies),
            ("external_account_id", &self.external_account_id),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value
                .as_ref()
                .map(|v| (column, FieldValue::Text(v.clone())))
        })
        .collect()
    }
}
