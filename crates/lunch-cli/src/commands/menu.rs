//! Menu import command
//!
//! Usage: lunch menu import <PATH>

use clap::{Args, Subcommand};
use lunch_engine::{apply_command, LunchCommand, LunchCommandResult};
use lunch_store::Database;
use std::path::PathBuf;

use crate::commands::CliResult;

#[derive(Debug, Args)]
pub struct MenuArgs {
    #[command(subcommand)]
    pub command: MenuCommand,
}

#[derive(Debug, Subcommand)]
pub enum MenuCommand {
    /// Import meals from a JSON menu file
    Import {
        /// Path to a file of the form {"meals": [{"name", "type", "price"}]}
        path: PathBuf,
    },
}

pub fn execute(args: MenuArgs, db: &Database) -> CliResult {
    match args.command {
        MenuCommand::Import { path } => {
            println!("Importing {}...", path.display());
            if let LunchCommandResult::MenuImported(summary) =
                apply_command(LunchCommand::ImportMenu { path }, db)?
            {
                println!(
                    "Imported {} meals ({} already on the menu)",
                    summary.added, summary.skipped
                );
            }
        }
    }
    Ok(())
}
