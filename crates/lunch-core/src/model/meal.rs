use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{resolve_column, FieldValue, Patch};
use crate::errors::{LunchError, Result};
use crate::rating::RatingSummary;

/// A meal on the menu together with its aggregated rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// main, salad, dessert, drink, snack, ...
    pub category: Option<String>,
    /// Running average of all scores, 0.0 when unrated
    pub rating: f64,
    pub rating_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Meal {
    pub fn rating_summary(&self) -> RatingSummary {
        RatingSummary {
            average: self.rating,
            count: self.rating_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMeal {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
}

impl NewMeal {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl MealPatch {
    pub const COLUMNS: &'static [&'static str] = &["name", "description", "price", "category"];

    /// Build a patch from textual `(column, value)` pairs; `price` must parse
    /// as a number.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut patch = Self::default();
        for (column, value) in pairs {
            let value: String = value.into();
            match resolve_column(Self::TABLE, Self::COLUMNS, column.as_ref())? {
                "name" => patch.name = Some(value),
                "description" => patch.description = Some(value),
                "price" => {
                    let price = value.trim().parse::<f64>().map_err(|e| {
                        LunchError::InvalidField {
                            column: "price".to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                    patch.price = Some(price);
                }
                _ => patch.category = Some(value),
            }
        }
        Ok(patch)
    }
}

impl Patch for MealPatch {
    const TABLE: &'static str = "meals";

    fn assignments(&self) -> Vec<(&'static str, FieldValue)> {
        let mut out = Vec::new();
        if let Some(name) = &self.name {
            out.push(("name", FieldValue::Text(name.clone())));
        }
        if let Some(description) = &self.description {
            out.push(("description", FieldValue::Text(description.clone())));
        }
        if let Some(price) = self.price {
            out.push(("price", FieldValue::Real(price)));
        }
        if let Some(category) = &self.category {
            out.push(("category", FieldValue::Text(category.clone())));
        }
        out
    }
}

/// A meal scheduled for a serving date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMeal {
    pub schedule_id: i64,
    pub meal: Meal,
    pub date: NaiveDate,
    pub available_quantity: i64,
}
