//! Meal commands
//!
//! Usage: lunch meal add|list|search|today|schedule|rate|ratings

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use lunch_core::model::{Meal, NewMeal};
use lunch_engine::{apply_command, apply_query, LunchCommand, LunchCommandResult, LunchQuery, LunchQueryResult};
use lunch_store::Database;

use crate::commands::{format_meal, parse_date_arg, today, CliResult};

#[derive(Debug, Args)]
pub struct MealArgs {
    #[command(subcommand)]
    pub command: MealCommand,
}

#[derive(Debug, Subcommand)]
pub enum MealCommand {
    /// Add a meal to the catalogue
    Add(AddArgs),
    /// List meals, optionally one category only
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Find meals by name, description or category
    Search { term: String },
    /// Show the menu for today or a given date, or every meal when none is scheduled
    Today {
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Put a meal on the menu for a date
    Schedule(ScheduleArgs),
    /// Rate a meal from 1 to 5
    Rate(RateArgs),
    /// List the individual ratings of a meal
    Ratings { meal_id: i64 },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub name: String,
    #[arg(long, default_value_t = 0.0)]
    pub price: f64,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    pub meal_id: i64,
    #[arg(long, value_parser = parse_date_arg)]
    pub date: NaiveDate,
    /// Portions available
    #[arg(long, default_value_t = 0)]
    pub quantity: i64,
}

#[derive(Debug, Args)]
pub struct RateArgs {
    pub meal_id: i64,
    pub score: f64,
    /// Student giving the rating; anonymous when omitted
    #[arg(long)]
    pub student: Option<i64>,
    #[arg(long)]
    pub comment: Option<String>,
}

pub fn execute(args: MealArgs, db: &Database) -> CliResult {
    match args.command {
        MealCommand::Add(add) => {
            let mut meal = NewMeal::new(add.name, add.price);
            meal.description = add.description;
            meal.category = add.category;
            if let LunchCommandResult::MealAdded { meal_id } =
                apply_command(LunchCommand::AddMeal(meal), db)?
            {
                println!("Added meal {}", meal_id);
            }
        }
        MealCommand::List { category } => {
            if let LunchQueryResult::Meals(meals) = apply_query(LunchQuery::ListMeals { category }, db)? {
                print_meals(&meals);
            }
        }
        MealCommand::Search { term } => {
            if let LunchQueryResult::Meals(meals) = apply_query(LunchQuery::SearchMeals { term }, db)? {
                print_meals(&meals);
            }
        }
        MealCommand::Today { date } => {
            let date = date.unwrap_or_else(today);
            if let LunchQueryResult::Menu(menu) = apply_query(LunchQuery::MealsForDate { date }, db)? {
                // Nothing scheduled: offer the whole catalogue instead
                if menu.is_empty() {
                    println!("No meals scheduled for {}; showing all meals.", date);
                    if let LunchQueryResult::Meals(meals) =
                        apply_query(LunchQuery::ListMeals { category: None }, db)?
                    {
                        print_meals(&meals);
                    }
                }
                for scheduled in menu {
                    println!(
                        "{}  [{} left]",
                        format_meal(&scheduled.meal),
                        scheduled.available_quantity
                    );
                }
            }
        }
        MealCommand::Schedule(schedule) => {
            if let LunchCommandResult::MealScheduled { schedule_id } = apply_command(
                LunchCommand::ScheduleMeal {
                    meal_id: schedule.meal_id,
                    date: schedule.date,
                    quantity: schedule.quantity,
                },
                db,
            )? {
                println!(
                    "Scheduled meal {} on {} (schedule {})",
                    schedule.meal_id, schedule.date, schedule_id
                );
            }
        }
        MealCommand::Rate(rate) => {
            if let LunchCommandResult::MealRated(summary) = apply_command(
                LunchCommand::RateMeal {
                    meal_id: rate.meal_id,
                    score: rate.score,
                    student_id: rate.student,
                    comment: rate.comment,
                },
                db,
            )? {
                println!(
                    "Rated meal {}: average {:.1} from {} ratings",
                    rate.meal_id,
                    summary.display_average(),
                    summary.count
                );
            }
        }
        MealCommand::Ratings { meal_id } => {
            if let LunchQueryResult::Ratings(ratings) =
                apply_query(LunchQuery::MealRatings { meal_id }, db)?
            {
                if ratings.is_empty() {
                    println!("No ratings yet.");
                }
                for rating in ratings {
                    let who = rating
                        .student_id
                        .map(|id| format!("student {}", id))
                        .unwrap_or_else(|| "anonymous".to_string());
                    println!(
                        "{:.1}  {:<12} {}",
                        rating.score,
                        who,
                        rating.comment.as_deref().unwrap_or("")
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_meals(meals: &[Meal]) {
    if meals.is_empty() {
        println!("No meals found.");
    }
    for meal in meals {
        println!("{}", format_meal(meal));
    }
}
