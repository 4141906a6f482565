//! Student commands
//!
//! Usage: lunch student add|list|search|show

use clap::{Args, Subcommand};
use lunch_core::model::NewStudent;
use lunch_engine::{apply_command, apply_query, LunchCommand, LunchCommandResult, LunchQuery, LunchQueryResult};
use lunch_store::Database;

use crate::commands::{format_student, CliResult};

#[derive(Debug, Args)]
pub struct StudentArgs {
    #[command(subcommand)]
    pub command: StudentCommand,
}

#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    /// Register a student
    Add(AddArgs),
    /// List all students
    List,
    /// Find students by name, grade or class
    Search { term: String },
    /// Show one student with their order history
    Show { id: i64 },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub name: String,
    #[arg(long)]
    pub grade: Option<String>,
    #[arg(long)]
    pub class: Option<String>,
    #[arg(long)]
    pub allergies: Option<String>,
    /// Account id in an external payment system
    #[arg(long)]
    pub account: Option<String>,
}

pub fn execute(args: StudentArgs, db: &Database) -> CliResult {
    match args.command {
        StudentCommand::Add(add) => {
            let mut student = NewStudent::new(add.name);
            student.grade = add.grade;
            student.class = add.class;
            student.allergies = add.allergies;
            student.external_account_id = add.account;
            if let LunchCommandResult::StudentAdded { student_id } =
                apply_command(LunchCommand::AddStudent(student), db)?
            {
                println!("Added student {}", student_id);
            }
        }
        StudentCommand::List => {
            if let LunchQueryResult::Students(students) = apply_query(LunchQuery::ListStudents, db)? {
                print_students(&students);
            }
        }
        StudentCommand::Search { term } => {
            if let LunchQueryResult::Students(students) =
                apply_query(LunchQuery::SearchStudents { term }, db)?
            {
                print_students(&students);
            }
        }
        StudentCommand::Show { id } => show(id, db)?,
    }
    Ok(())
}

fn print_students(students: &[lunch_core::model::Student]) {
    if students.is_empty() {
        println!("No students found.");
    }
    for student in students {
        println!("{}", format_student(student));
    }
}

fn show(id: i64, db: &Database) -> CliResult {
    let LunchQueryResult::Student(Some(student)) =
        apply_query(LunchQuery::GetStudent { student_id: id }, db)?
    else {
        return Err(format!("student {} not found", id).into());
    };

    println!("{}", format_student(&student));
    if let Some(allergies) = &student.allergies {
        println!("      allergies: {}", allergies);
    }

    if let LunchQueryResult::History(orders) =
        apply_query(LunchQuery::OrderHistory { student_id: id }, db)?
    {
        if orders.is_empty() {
            println!("      no orders");
        }
        for order in orders {
            println!(
                "      {}  #{:<5} {:<28} {:>7.2}  {}",
                order.transaction.date,
                order.transaction.id,
                order.meal_name,
                order.price,
                order.transaction.status
            );
        }
    }
    Ok(())
}
