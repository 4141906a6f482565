//! Engine-level read-only query surface.
//!
//! `apply_query` is the single entry point for lookups that never write.
//! Missing single entities come back as `None`/empty rather than errors;
//! the caller decides whether absence is a failure.

use std::time::Instant;

use chrono::NaiveDate;
use lunch_core::model::{
    Meal, MealRating, Record, ScheduledMeal, Student, StudentOrder, Transaction,
};
use lunch_core::{log_op_end, log_op_error, log_op_start};
use lunch_store::errors::Result;
use lunch_store::{Database, MealRepo, OrderRepo, RatingRepo, RecordRepo, StudentRepo};

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum LunchQuery {
    // ── Student ───────────────────────────────────────────────────────────────
    GetStudent { student_id: i64 },
    ListStudents,
    SearchStudents { term: String },
    /// Lookup by full name, ignoring ASCII letter case.
    Login { name: String },

    // ── Meal ──────────────────────────────────────────────────────────────────
    GetMeal { meal_id: i64 },
    /// All meals, or only those of one category.
    ListMeals { category: Option<String> },
    SearchMeals { term: String },
    /// Menu for a serving date.
    MealsForDate { date: NaiveDate },
    MealRatings { meal_id: i64 },

    // ── Order ─────────────────────────────────────────────────────────────────
    GetTransaction { transaction_id: i64 },
    OrderHistory { student_id: i64 },
    DailyTransactions { date: NaiveDate },

    // ── Record ────────────────────────────────────────────────────────────────
    GetRecord { record_id: i64 },
    ListRecords,
    SearchRecords { term: String },
    RecordCount,
}

impl LunchQuery {
    pub fn op_name(&self) -> &'static str {
        match self {
            LunchQuery::GetStudent { .. } => "student_get",
            LunchQuery::ListStudents => "student_list",
            LunchQuery::SearchStudents { .. } => "student_search",
            LunchQuery::Login { .. } => "student_login",
            LunchQuery::GetMeal { .. } => "meal_get",
            LunchQuery::ListMeals { .. } => "meal_list",
            LunchQuery::SearchMeals { .. } => "meal_search",
            LunchQuery::MealsForDate { .. } => "meal_for_date",
            LunchQuery::MealRatings { .. } => "meal_ratings",
            LunchQuery::GetTransaction { .. } => "transaction_get",
            LunchQuery::OrderHistory { .. } => "order_history",
            LunchQuery::DailyTransactions { .. } => "order_daily",
            LunchQuery::GetRecord { .. } => "record_get",
            LunchQuery::ListRecords => "record_list",
            LunchQuery::SearchRecords { .. } => "record_search",
            LunchQuery::RecordCount => "record_count",
        }
    }
}

/// Result of a read-only query.
#[derive(Debug, Clone, PartialEq)]
pub enum LunchQueryResult {
    Student(Option<Student>),
    Students(Vec<Student>),
    Meal(Option<Meal>),
    Meals(Vec<Meal>),
    Menu(Vec<ScheduledMeal>),
    Ratings(Vec<MealRating>),
    Transaction(Option<Transaction>),
    Transactions(Vec<Transaction>),
    History(Vec<StudentOrder>),
    Record(Option<Record>),
    Records(Vec<Record>),
    Count(i64),
}

/// Run a read-only query.
pub fn apply_query(query: LunchQuery, db: &Database) -> Result<LunchQueryResult> {
    let op = query.op_name();
    log_op_start!(op);
    let start = Instant::now();

    let result = db.with_conn(|conn| match query {
        LunchQuery::GetStudent { student_id } => {
            StudentRepo::get_student(conn, student_id).map(LunchQueryResult::Student)
        }
        LunchQuery::ListStudents => {
            StudentRepo::get_all_students(conn).map(LunchQueryResult::Students)
        }
        LunchQuery::SearchStudents { term } => {
            StudentRepo::search_students(conn, &term).map(LunchQueryResult::Students)
        }
        LunchQuery::Login { name } => {
            StudentRepo::find_student_by_name(conn, &name).map(LunchQueryResult::Student)
        }

        LunchQuery::GetMeal { meal_id } => {
            MealRepo::get_meal(conn, meal_id).map(LunchQueryResult::Meal)
        }
        LunchQuery::ListMeals { category: None } => {
            MealRepo::get_all_meals(conn).map(LunchQueryResult::Meals)
        }
        LunchQuery::ListMeals {
            category: Some(category),
        } => MealRepo::get_meals_by_category(conn, &category).map(LunchQueryResult::Meals),
        LunchQuery::SearchMeals { term } => {
            MealRepo::search_meals(conn, &term).map(LunchQueryResult::Meals)
        }
        LunchQuery::MealsForDate { date } => {
            MealRepo::get_meals_by_date(conn, date).map(LunchQueryResult::Menu)
        }
        LunchQuery::MealRatings { meal_id } => {
            RatingRepo::get_meal_ratings(conn, meal_id).map(LunchQueryResult::Ratings)
        }

        LunchQuery::GetTransaction { transaction_id } => {
            OrderRepo::get_transaction(conn, transaction_id).map(LunchQueryResult::Transaction)
        }
        LunchQuery::OrderHistory { student_id } => {
            OrderRepo::get_student_transactions(conn, student_id).map(LunchQueryResult::History)
        }
        LunchQuery::DailyTransactions { date } => {
            OrderRepo::get_daily_transactions(conn, date).map(LunchQueryResult::Transactions)
        }

        LunchQuery::GetRecord { record_id } => {
            RecordRepo::get_record(conn, record_id).map(LunchQueryResult::Record)
        }
        LunchQuery::ListRecords => RecordRepo::get_all_records(conn).map(LunchQueryResult::Records),
        LunchQuery::SearchRecords { term } => {
            RecordRepo::search_records(conn, &term).map(LunchQueryResult::Records)
        }
        LunchQuery::RecordCount => RecordRepo::get_record_count(conn).map(LunchQueryResult::Count),
    });

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
