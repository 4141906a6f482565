//! Order commands
//!
//! Usage: lunch order place|history|cancel

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use lunch_engine::{apply_command, apply_query, LunchCommand, LunchCommandResult, LunchQuery, LunchQueryResult};
use lunch_store::Database;

use crate::commands::{parse_date_arg, today, CliResult};

#[derive(Debug, Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Buy one or more meals for a student
    Place {
        student_id: i64,
        #[arg(required = true)]
        meal_ids: Vec<i64>,
        /// Order date; defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Order history of a student, newest first
    History { student_id: i64 },
    /// Cancel a transaction
    Cancel { transaction_id: i64 },
}

pub fn execute(args: OrderArgs, db: &Database) -> CliResult {
    match args.command {
        OrderCommand::Place {
            student_id,
            meal_ids,
            date,
        } => {
            let date = date.unwrap_or_else(today);
            if let LunchCommandResult::OrderPlaced { transaction_ids } = apply_command(
                LunchCommand::PlaceOrder {
                    student_id,
                    meal_ids,
                    date,
                },
                db,
            )? {
                let ids: Vec<String> = transaction_ids.iter().map(|id| id.to_string()).collect();
                println!(
                    "Order placed for {}: transactions {}",
                    date,
                    ids.join(", ")
                );
            }
        }
        OrderCommand::History { student_id } => {
            if let LunchQueryResult::History(orders) =
                apply_query(LunchQuery::OrderHistory { student_id }, db)?
            {
                if orders.is_empty() {
                    println!("No orders found.");
                }
                for order in orders {
                    println!(
                        "{}  #{:<5} {:<28} {:>7.2}  {}",
                        order.transaction.date,
                        order.transaction.id,
                        order.meal_name,
                        order.price,
                        order.transaction.status
                    );
                }
            }
        }
        OrderCommand::Cancel { transaction_id } => {
            match apply_command(LunchCommand::CancelOrder { transaction_id }, db)? {
                LunchCommandResult::Changed(true) => {
                    println!("Cancelled transaction {}", transaction_id)
                }
                _ => {
                    return Err(format!(
                        "transaction {} not found or already cancelled",
                        transaction_id
                    )
                    .into())
                }
            }
        }
    }
    Ok(())
}
