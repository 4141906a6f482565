//! Menu documents and the built-in starter menu
//!
//! A menu file is JSON of the form:
//!
//! ```json
//! { "meals": [ { "name": "Tacos", "type": "main", "price": 45.0 } ] }
//! ```
//!
//! `type` becomes the meal category (default `main`), the description
//! defaults to the name and the price to `0.0`.

use serde::{Deserialize, Serialize};

use crate::errors::{LunchError, Result};
use crate::model::NewMeal;

pub const DEFAULT_CATEGORY: &str = "main";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFile {
    #[serde(default)]
    pub meals: Vec<MenuEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuEntry {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl MenuEntry {
    pub fn category(&self) -> &str {
        self.meal_type.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn to_new_meal(&self) -> NewMeal {
        NewMeal::new(self.name.clone(), self.price.unwrap_or(0.0))
            .with_description(self.description.clone().unwrap_or_else(|| self.name.clone()))
            .with_category(self.category())
    }
}

/// Outcome of importing a menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Parse a menu document, rejecting one without meals
pub fn parse_menu(json: &str) -> Result<Vec<MenuEntry>> {
    let menu: MenuFile = serde_json::from_str(json)?;
    if menu.meals.is_empty() {
        return Err(LunchError::EmptyMenu);
    }
    Ok(menu.meals)
}

/// Starter menu installed by `setup_initial_data`
pub fn sample_meals() -> Vec<NewMeal> {
    vec![
        NewMeal::new("Chicken Pasta", 45.0)
            .with_description("Creamy chicken pasta with vegetables")
            .with_category("main"),
        NewMeal::new("Vegetarian Salad", 35.0)
            .with_description("Fresh mixed salad with dressing")
            .with_category("salad"),
        NewMeal::new("Fish and Chips", 50.0)
            .with_description("Crispy fish with potato chips")
            .with_category("main"),
        NewMeal::new("Fruit Cup", 20.0)
            .with_description("Mixed seasonal fruits")
            .with_category("dessert"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_maps_type_to_category() {
        let entries =
            parse_menu(r#"{"meals":[{"name":"Tacos","type":"main","price":45.0},{"name":"Soup"}]}"#)
                .unwrap();
        assert_eq!(entries.len(), 2);

        let tacos = entries[0].to_new_meal();
        assert_eq!(tacos.category.as_deref(), Some("main"));
        assert_eq!(tacos.description.as_deref(), Some("Tacos"));
        assert_eq!(tacos.price, 45.0);

        let soup = entries[1].to_new_meal();
        assert_eq!(soup.category.as_deref(), Some(DEFAULT_CATEGORY));
        assert_eq!(soup.price, 0.0);
    }

    #[test]
    fn test_parse_menu_without_meals() {
        assert_eq!(parse_menu(r#"{"meals":[]}"#).unwrap_err(), LunchError::EmptyMenu);
        assert_eq!(parse_menu("{}").unwrap_err(), LunchError::EmptyMenu);
    }

    #[test]
    fn test_parse_menu_invalid_json() {
        assert!(matches!(
            parse_menu("{not json"),
            Err(LunchError::Serialization { .. })
        ));
    }

    #[test]
    fn test_sample_menu() {
        let meals = sample_meals();
        assert_eq!(meals.len(), 4);
        assert!(meals.iter().all(|m| m.price > 0.0));
    }
}
