//! Mutating commands.
//!
//! `apply_command` is the single entry point for every write. Each command
//! is bracketed by the canonical op events:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use lunch_core::menu::ImportSummary;
use lunch_core::model::{MealPatch, NewMeal, NewRecord, NewStudent, RecordPatch, StudentPatch};
use lunch_core::rating::{RatingSummary, Score};
use lunch_core::{log_op_end, log_op_error, log_op_start};
use lunch_store::errors::Result;
use lunch_store::seed::{import_menu, setup_initial_data};
use lunch_store::{Database, MealRepo, OrderRepo, RatingRepo, RecordRepo, StudentRepo};

/// Commands that change the database.
#[derive(Debug, Clone)]
pub enum LunchCommand {
    /// Install the starter menu (idempotent).
    SetupInitialData,
    /// Import a JSON menu file.
    ImportMenu { path: PathBuf },

    AddStudent(NewStudent),
    UpdateStudent { student_id: i64, patch: StudentPatch },

    AddMeal(NewMeal),
    UpdateMeal { meal_id: i64, patch: MealPatch },
    ScheduleMeal {
        meal_id: i64,
        date: NaiveDate,
        quantity: i64,
    },
    /// Add one score to a meal's running average. The raw score is
    /// validated here so an out-of-range value is logged like any failure.
    RateMeal {
        meal_id: i64,
        score: f64,
        student_id: Option<i64>,
        comment: Option<String>,
    },

    /// Buy one or more meals; all lines are recorded or none are.
    PlaceOrder {
        student_id: i64,
        meal_ids: Vec<i64>,
        date: NaiveDate,
    },
    CancelOrder { transaction_id: i64 },

    AddRecord(NewRecord),
    UpdateRecord { record_id: i64, patch: RecordPatch },
    DeleteRecord { record_id: i64 },
}

impl LunchCommand {
    /// Operation name used in log events
    pub fn op_name(&self) -> &'static str {
        match self {
            LunchCommand::SetupInitialData => "setup_initial_data",
            LunchCommand::ImportMenu { .. } => "import_menu",
            LunchCommand::AddStudent(_) => "add_student",
            LunchCommand::UpdateStudent { .. } => "update_student",
            LunchCommand::AddMeal(_) => "add_meal",
            LunchCommand::UpdateMeal { .. } => "update_meal",
            LunchCommand::ScheduleMeal { .. } => "schedule_meal",
            LunchCommand::RateMeal { .. } => "rate_meal",
            LunchCommand::PlaceOrder { .. } => "place_order",
            LunchCommand::CancelOrder { .. } => "cancel_order",
            LunchCommand::AddRecord(_) => "add_record",
            LunchCommand::UpdateRecord { .. } => "update_record",
            LunchCommand::DeleteRecord { .. } => "delete_record",
        }
    }
}

/// Result of applying a command.
#[derive(Debug, Clone, PartialEq)]
pub enum LunchCommandResult {
    InitialDataInstalled { added: usize },
    MenuImported(ImportSummary),
    StudentAdded { student_id: i64 },
    MealAdded { meal_id: i64 },
    MealScheduled { schedule_id: i64 },
    MealRated(RatingSummary),
    OrderPlaced { transaction_ids: Vec<i64> },
    RecordAdded { record_id: i64 },
    /// Update, delete or cancel: whether a row changed
    Changed(bool),
}

/// Apply a command against the database.
pub fn apply_command(cmd: LunchCommand, db: &Database) -> Result<LunchCommandResult> {
    let op = cmd.op_name();
    log_op_start!(op);
    let start = Instant::now();

    let result = execute(cmd, db);

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = elapsed);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = elapsed);
        }
    }
    result
}

fn execute(cmd: LunchCommand, db: &Database) -> Result<LunchCommandResult> {
    match cmd {
        LunchCommand::SetupInitialData => {
            let added = db.with_conn(setup_initial_data)?;
            Ok(LunchCommandResult::InitialDataInstalled { added })
        }
        LunchCommand::ImportMenu { path } => {
            let summary = db.with_conn(|conn| import_menu(&path, conn))?;
            Ok(LunchCommandResult::MenuImported(summary))
        }

        LunchCommand::AddStudent(student) => {
            let student_id = db.with_conn(|conn| StudentRepo::add_student(conn, &student))?;
            Ok(LunchCommandResult::StudentAdded { student_id })
        }
        LunchCommand::UpdateStudent { student_id, patch } => {
            let changed =
                db.with_conn(|conn| StudentRepo::update_student(conn, student_id, &patch))?;
            Ok(LunchCommandResult::Changed(changed))
        }

        LunchCommand::AddMeal(meal) => {
            let meal_id = db.with_conn(|conn| MealRepo::add_meal(conn, &meal))?;
            Ok(LunchCommandResult::MealAdded { meal_id })
        }
        LunchCommand::UpdateMeal { meal_id, patch } => {
            let changed = db.with_conn(|conn| MealRepo::update_meal(conn, meal_id, &patch))?;
            Ok(LunchCommandResult::Changed(changed))
        }
        LunchCommand::ScheduleMeal {
            meal_id,
            date,
            quantity,
        } => {
            let schedule_id =
                db.with_conn(|conn| MealRepo::schedule_meal(conn, meal_id, date, quantity))?;
            Ok(LunchCommandResult::MealScheduled { schedule_id })
        }
        LunchCommand::RateMeal {
            meal_id,
            score,
            student_id,
            comment,
        } => {
            let score = Score::new(score)?;
            let summary = db.transaction(|tx| {
                RatingRepo::rate_meal(tx, meal_id, score, student_id, comment.as_deref())
            })?;
            Ok(LunchCommandResult::MealRated(summary))
        }

        LunchCommand::PlaceOrder {
            student_id,
            meal_ids,
            date,
        } => {
            let transaction_ids =
                db.transaction(|tx| OrderRepo::place_order(tx, student_id, &meal_ids, date))?;
            Ok(LunchCommandResult::OrderPlaced { transaction_ids })
        }
        LunchCommand::CancelOrder { transaction_id } => {
            let changed =
                db.with_conn(|conn| OrderRepo::cancel_transaction(conn, transaction_id))?;
            Ok(LunchCommandResult::Changed(changed))
        }

        LunchCommand::AddRecord(record) => {
            let record_id = db.with_conn(|conn| RecordRepo::add_record(conn, &record))?;
            Ok(LunchCommandResult::RecordAdded { record_id })
        }
        LunchCommand::UpdateRecord { record_id, patch } => {
            let changed = db.with_conn(|conn| RecordRepo::update_record(conn, record_id, &patch))?;
            Ok(LunchCommandResult::Changed(changed))
        }
        LunchCommand::DeleteRecord { record_id } => {
            let changed = db.with_conn(|conn| RecordRepo::delete_record(conn, record_id))?;
            Ok(LunchCommandResult::Changed(changed))
        }
    }
}
