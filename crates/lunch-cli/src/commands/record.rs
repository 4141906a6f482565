//! Generic record store commands
//!
//! Usage: lunch record add|get|list|update|delete|search|count

use clap::{Args, Subcommand};
use lunch_core::model::{NewRecord, Record, RecordPatch};
use lunch_engine::{apply_command, apply_query, LunchCommand, LunchCommandResult, LunchQuery, LunchQueryResult};
use lunch_store::Database;

use crate::commands::CliResult;

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    Add {
        name: String,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        example_field: Option<String>,
    },
    Get { id: i64 },
    List,
    /// Set columns, e.g. `lunch record update 3 value=69 example_field=dev`
    Update {
        id: i64,
        #[arg(required = true, value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    Delete { id: i64 },
    /// Substring search over name, value and example_field
    Search { term: String },
    Count,
}

fn parse_assignment(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(column, value)| (column.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected column=value, got '{}'", value))
}

pub fn execute(args: RecordArgs, db: &Database) -> CliResult {
    match args.command {
        RecordCommand::Add {
            name,
            value,
            example_field,
        } => {
            let record = NewRecord {
                name,
                value,
                example_field,
            };
            if let LunchCommandResult::RecordAdded { record_id } =
                apply_command(LunchCommand::AddRecord(record), db)?
            {
                println!("Added record {}", record_id);
            }
        }
        RecordCommand::Get { id } => {
            match apply_query(LunchQuery::GetRecord { record_id: id }, db)? {
                LunchQueryResult::Record(Some(record)) => print_record(&record),
                _ => return Err(format!("record {} not found", id).into()),
            }
        }
        RecordCommand::List => {
            if let LunchQueryResult::Records(records) = apply_query(LunchQuery::ListRecords, db)? {
                records.iter().for_each(print_record);
            }
        }
        RecordCommand::Update { id, fields } => {
            let patch = RecordPatch::from_pairs(fields)?;
            match apply_command(LunchCommand::UpdateRecord { record_id: id, patch }, db)? {
                LunchCommandResult::Changed(true) => println!("Updated record {}", id),
                _ => println!("Record {} unchanged", id),
            }
        }
        RecordCommand::Delete { id } => {
            match apply_command(LunchCommand::DeleteRecord { record_id: id }, db)? {
                LunchCommandResult::Changed(true) => println!("Deleted record {}", id),
                _ => return Err(format!("record {} not found", id).into()),
            }
        }
        RecordCommand::Search { term } => {
            if let LunchQueryResult::Records(records) =
                apply_query(LunchQuery::SearchRecords { term }, db)?
            {
                records.iter().for_each(print_record);
            }
        }
        RecordCommand::Count => {
            if let LunchQueryResult::Count(count) = apply_query(LunchQuery::RecordCount, db)? {
                println!("{}", count);
            }
        }
    }
    Ok(())
}

fn print_record(record: &Record) {
    println!(
        "{:>4}  {}  value={}  example_field={}",
        record.id,
        record.name,
        record.value.as_deref().unwrap_or(""),
        record.example_field.as_deref().unwrap_or("")
    );
}
