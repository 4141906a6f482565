//! `lunch init` and `lunch login`

use clap::Args;
use lunch_engine::{apply_command, apply_query, LunchCommand, LunchCommandResult, LunchQuery, LunchQueryResult};
use lunch_store::Database;

use crate::commands::CliResult;
use crate::config::LunchConfig;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Install the starter menu
    #[arg(long)]
    pub sample_data: bool,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Full student name (case-insensitive)
    pub name: String,
}

/// The database is created and migrated when opened, so init only has to
/// report it and optionally seed the menu.
pub fn execute_init(args: InitArgs, db: &Database, config: &LunchConfig) -> CliResult {
    println!("Database ready at {}", config.db_path.display());

    if args.sample_data || config.sample_data {
        if let LunchCommandResult::InitialDataInstalled { added } =
            apply_command(LunchCommand::SetupInitialData, db)?
        {
            println!("Added {} sample meals", added);
        }
    }
    Ok(())
}

pub fn execute_login(args: LoginArgs, db: &Database) -> CliResult {
    match apply_query(LunchQuery::Login { name: args.name.clone() }, db)? {
        LunchQueryResult::Student(Some(student)) => {
            println!("Welcome, {}! (student id {})", student.name, student.id);
            Ok(())
        }
        _ => Err(format!("no student named '{}'", args.name.trim()).into()),
    }
}
