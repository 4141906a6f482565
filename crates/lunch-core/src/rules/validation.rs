//! Input validation for lunch entities
//!
//! Validators return the normalized value so callers store exactly what was
//! checked.

use chrono::NaiveDate;

use crate::errors::{LunchError, Result};
use crate::model::{MealPatch, NewMeal, NewStudent, StudentPatch};

/// Storage and display format for serving and order dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trim a name and reject it when nothing is left
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LunchError::InvalidName {
            reason: "name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

pub fn validate_price(price: f64) -> Result<f64> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(LunchError::InvalidPrice { price })
    }
}

pub fn validate_quantity(quantity: i64) -> Result<i64> {
    if quantity < 0 {
        return Err(LunchError::InvalidQuantity { quantity });
    }
    Ok(quantity)
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| LunchError::InvalidDate {
        value: value.to_string(),
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn validate_new_student(student: &NewStudent) -> Result<NewStudent> {
    Ok(NewStudent {
        name: validate_name(&student.name)?,
        ..student.clone()
    })
}

pub fn validate_student_patch(patch: &StudentPatch) -> Result<StudentPatch> {
    let name = patch.name.as_deref().map(validate_name).transpose()?;
    Ok(StudentPatch {
        name,
        ..patch.clone()
    })
}

pub fn validate_new_meal(meal: &NewMeal) -> Result<NewMeal> {
    Ok(NewMeal {
        name: validate_name(&meal.name)?,
        price: validate_price(meal.price)?,
        ..meal.clone()
    })
}

pub fn validate_meal_patch(patch: &MealPatch) -> Result<MealPatch> {
    let name = patch.name.as_deref().map(validate_name).transpose()?;
    let price = patch.price.map(validate_price).transpose()?;
    Ok(MealPatch {
        name,
        price,
        ..patch.clone()
    })
}
