//! Menu import and starter data
//!
//! Provides:
//! - JSON menu file import, skipping meals already on the menu
//! - The starter menu installed by `init`

pub mod importer;

pub use importer::{import_menu, import_menu_str, setup_initial_data};
