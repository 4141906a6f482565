//! Staff statistics and reports
//!
//! Usage: lunch stats | lunch report popular|daily|students|top-rated

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use lunch_engine::commands::reports::DEFAULT_LIMIT;
use lunch_engine::{run_report, Report};
use lunch_store::Database;

use crate::commands::{parse_date_arg, today, CliResult};

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Day counted as "today"
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Most ordered meals
    Popular {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Orders and revenue for one day
    Daily {
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Orders and spend per student
    Students,
    /// Best rated meals
    TopRated {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
}

pub fn execute_stats(args: StatsArgs, db: &Database) -> CliResult {
    let today = args.date.unwrap_or_else(today);
    print!("{}", run_report(Report::Statistics { today }, db)?);
    Ok(())
}

pub fn execute(args: ReportArgs, db: &Database) -> CliResult {
    let report = match args.command {
        ReportCommand::Popular { limit } => Report::PopularMeals { limit },
        ReportCommand::Daily { date } => Report::DailySales {
            date: date.unwrap_or_else(today),
        },
        ReportCommand::Students => Report::StudentActivity,
        ReportCommand::TopRated { limit } => Report::TopRated { limit },
    };
    print!("{}", run_report(report, db)?);
    Ok(())
}
