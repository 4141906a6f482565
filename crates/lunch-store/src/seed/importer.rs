//! Menu importer
//!
//! Each import runs in a single transaction: a bad entry halfway through the
//! file leaves the menu untouched.

use crate::errors::{from_rusqlite, io_error, Result};
use crate::repo::MealRepo;
use lunch_core::menu::{parse_menu, sample_meals, ImportSummary};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Import a JSON menu file
///
/// A meal whose name and category are already on the menu is skipped.
pub fn import_menu(path: &Path, conn: &mut Connection) -> Result<ImportSummary> {
    let content = fs::read_to_string(path).map_err(|e| {
        io_error("import_menu", e).with_entity_id(path.display().to_string())
    })?;
    import_menu_str(&content, conn)
}

/// Import a menu from JSON text
pub fn import_menu_str(json: &str, conn: &mut Connection) -> Result<ImportSummary> {
    let entries = parse_menu(json)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut summary = ImportSummary::default();
    for entry in &entries {
        if MealRepo::find_meal(&tx, entry.name.trim(), Some(entry.category()))?.is_some() {
            tracing::debug!(name = %entry.name, "meal already on menu, skipping");
            summary.skipped += 1;
            continue;
        }
        MealRepo::add_meal(&tx, &entry.to_new_meal())?;
        summary.added += 1;
    }
    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(
        added = summary.added,
        skipped = summary.skipped,
        "menu imported"
    );
    Ok(summary)
}

/// Install the starter menu, skipping meals whose name already exists.
///
/// Returns how many meals were added; running it twice adds nothing.
pub fn setup_initial_data(conn: &mut Connection) -> Result<usize> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut added = 0;
    for meal in sample_meals() {
        if MealRepo::find_meal_by_name(&tx, &meal.name)?.is_some() {
            continue;
        }
        MealRepo::add_meal(&tx, &meal)?;
        added += 1;
    }
    tx.commit().map_err(from_rusqlite)?;
    Ok(added)
}
