//! School lunch CLI
//!
//! Command-line interface for students and staff

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lunch_core::logging_facility;
use lunch_store::Database;

mod commands;
mod config;

use commands::CliResult;

#[derive(Debug, Parser)]
#[command(name = "lunch")]
#[command(about = "School lunch ordering - menus, orders, ratings and reports", long_about = None)]
struct Cli {
    /// Database file (overrides config and LUNCH_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML config file; `lunch.toml` is picked up when present
    #[arg(long, global = true, env = "LUNCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the database, optionally with the starter menu
    Init(commands::init::InitArgs),
    /// Look up a student by name
    Login(commands::init::LoginArgs),
    /// Student management
    Student(commands::student::StudentArgs),
    /// Meals, daily menu and ratings
    Meal(commands::meal::MealArgs),
    /// Place, list and cancel orders
    Order(commands::order::OrderArgs),
    /// Bulk menu import
    Menu(commands::menu::MenuArgs),
    /// Summary statistics for staff
    Stats(commands::report::StatsArgs),
    /// Detailed reports
    Report(commands::report::ReportArgs),
    /// Generic record store
    Record(commands::record::RecordArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    let config = config::load(cli.config.as_deref(), cli.db)?;
    logging_facility::init(config.profile()?);

    let db = Database::open(&config.db_path)?;

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute_init(args, &db, &config),
        Commands::Login(args) => commands::init::execute_login(args, &db),
        Commands::Student(args) => commands::student::execute(args, &db),
        Commands::Meal(args) => commands::meal::execute(args, &db),
        Commands::Order(args) => commands::order::execute(args, &db),
        Commands::Menu(args) => commands::menu::execute(args, &db),
        Commands::Stats(args) => commands::report::execute_stats(args, &db),
        Commands::Report(args) => commands::report::execute(args, &db),
        Commands::Record(args) => commands::record::execute(args, &db),
    };

    db.close();
    result
}
