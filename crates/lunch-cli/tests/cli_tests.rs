//! CLI integration tests
//!
//! Each test runs the `lunch` binary against a scratch database.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn lunch(dir: &Path, db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lunch"))
        .current_dir(dir)
        .env_remove("LUNCH_DB")
        .env_remove("LUNCH_LOG")
        .env_remove("LUNCH_CONFIG")
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Scratch dir with an initialised database holding the starter menu
/// and one student (id 1).
fn setup() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("lunch.db");

    let init = lunch(temp_dir.path(), &db_path, &["init", "--sample-data"]);
    assert_ok(&init);
    assert!(stdout(&init).contains("Added 4 sample meals"));

    let add = lunch(
        temp_dir.path(),
        &db_path,
        &["student", "add", "Thandi Nkosi", "--grade", "7", "--class", "7B"],
    );
    assert_ok(&add);
    assert!(stdout(&add).contains("Added student 1"));

    (temp_dir, db_path)
}

#[test]
fn test_init_creates_database_with_sample_menu() {
    let (dir, db) = setup();
    assert!(db.exists());

    let output = lunch(dir.path(), &db, &["meal", "list"]);
    assert_ok(&output);
    let out = stdout(&output);
    assert!(out.contains("Chicken Pasta"));
    assert!(out.contains("Fruit Cup"));
    assert!(out.contains("unrated"));

    // Running init again does not duplicate the starter menu
    let again = lunch(dir.path(), &db, &["init", "--sample-data"]);
    assert_ok(&again);
    assert!(stdout(&again).contains("Added 0 sample meals"));
}

#[test]
fn test_meal_list_filters_by_category() {
    let (dir, db) = setup();
    let output = lunch(dir.path(), &db, &["meal", "list", "--category", "main"]);
    assert_ok(&output);
    let out = stdout(&output);
    assert!(out.contains("Fish and Chips"));
    assert!(!out.contains("Fruit Cup"));
}

#[test]
fn test_login_known_and_unknown_student() {
    let (dir, db) = setup();

    let ok = lunch(dir.path(), &db, &["login", "thandi nkosi"]);
    assert_ok(&ok);
    assert!(stdout(&ok).contains("Welcome, Thandi Nkosi!"));

    let missing = lunch(dir.path(), &db, &["login", "Nobody"]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("no student named 'Nobody'"));
}

#[test]
fn test_order_place_history_and_cancel() {
    let (dir, db) = setup();

    let place = lunch(
        dir.path(),
        &db,
        &["order", "place", "1", "1", "4", "--date", "2025-05-12"],
    );
    assert_ok(&place);
    assert!(stdout(&place).contains("transactions 1, 2"));

    let history = lunch(dir.path(), &db, &["order", "history", "1"]);
    assert_ok(&history);
    let out = stdout(&history);
    assert!(out.contains("Chicken Pasta"));
    assert!(out.contains("Fruit Cup"));
    assert!(out.contains("2025-05-12"));

    let cancel = lunch(dir.path(), &db, &["order", "cancel", "2"]);
    assert_ok(&cancel);

    let twice = lunch(dir.path(), &db, &["order", "cancel", "2"]);
    assert!(!twice.status.success());

    let daily = lunch(dir.path(), &db, &["report", "daily", "--date", "2025-05-12"]);
    assert_ok(&daily);
    assert!(stdout(&daily).contains("2025-05-12: 1 orders, revenue 45.00"));
}

#[test]
fn test_order_for_unknown_meal_fails_without_partial_writes() {
    let (dir, db) = setup();

    let place = lunch(dir.path(), &db, &["order", "place", "1", "1", "99"]);
    assert!(!place.status.success());
    assert!(String::from_utf8_lossy(&place.stderr).contains("ERR_NOT_FOUND"));

    let history = lunch(dir.path(), &db, &["order", "history", "1"]);
    assert_ok(&history);
    assert!(stdout(&history).contains("No orders found."));
}

#[test]
fn test_rate_meal_and_stats() {
    let (dir, db) = setup();

    let rate = lunch(
        dir.path(),
        &db,
        &["meal", "rate", "1", "4", "--student", "1", "--comment", "tasty"],
    );
    assert_ok(&rate);
    assert!(stdout(&rate).contains("average 4.0 from 1 ratings"));

    let rate = lunch(dir.path(), &db, &["meal", "rate", "1", "5"]);
    assert_ok(&rate);
    assert!(stdout(&rate).contains("average 4.5 from 2 ratings"));

    let out_of_range = lunch(dir.path(), &db, &["meal", "rate", "1", "9"]);
    assert!(!out_of_range.status.success());

    let ratings = lunch(dir.path(), &db, &["meal", "ratings", "1"]);
    assert_ok(&ratings);
    let out = stdout(&ratings);
    assert!(out.contains("tasty"));
    assert!(out.contains("anonymous"));

    let stats = lunch(dir.path(), &db, &["stats", "--date", "2025-05-12"]);
    assert_ok(&stats);
    let out = stdout(&stats);
    assert!(out.contains("Students:      1"));
    assert!(out.contains("Meals:         4"));
    assert!(out.contains("Avg rating:    4.5"));

    let top = lunch(dir.path(), &db, &["report", "top-rated"]);
    assert_ok(&top);
    assert!(stdout(&top).contains("Chicken Pasta"));
}

#[test]
fn test_schedule_and_todays_menu() {
    let (dir, db) = setup();

    let schedule = lunch(
        dir.path(),
        &db,
        &["meal", "schedule", "3", "--date", "2025-05-13", "--quantity", "40"],
    );
    assert_ok(&schedule);

    let menu = lunch(dir.path(), &db, &["meal", "today", "--date", "2025-05-13"]);
    assert_ok(&menu);
    let out = stdout(&menu);
    assert!(out.contains("Fish and Chips"));
    assert!(out.contains("[40 left]"));

    let empty = lunch(dir.path(), &db, &["meal", "today", "--date", "2025-05-14"]);
    assert_ok(&empty);
    let out = stdout(&empty);
    assert!(out.contains("No meals scheduled for 2025-05-14; showing all meals."));
    assert!(out.contains("Chicken Pasta"));
    assert!(out.contains("Fruit Cup"));
    assert!(!out.contains("left]"));
}

#[test]
fn test_menu_import_skips_existing_meals() {
    let (dir, db) = setup();
    let menu_path = dir.path().join("menu.json");
    fs::write(
        &menu_path,
        r#"{"meals":[
            {"name":"Chicken Pasta","type":"main","price":45.0},
            {"name":"Beef Stew","type":"main","price":55.0}
        ]}"#,
    )
    .unwrap();

    let output = lunch(
        dir.path(),
        &db,
        &["menu", "import", menu_path.to_str().unwrap()],
    );
    assert_ok(&output);
    assert!(stdout(&output).contains("Imported 1 meals (1 already on the menu)"));

    let search = lunch(dir.path(), &db, &["meal", "search", "stew"]);
    assert_ok(&search);
    assert!(stdout(&search).contains("Beef Stew"));
}

#[test]
fn test_record_crud() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("records.db");
    let dir = temp_dir.path();

    let add = lunch(dir, &db, &["record", "add", "alpha", "--value", "42"]);
    assert_ok(&add);
    assert!(stdout(&add).contains("Added record 1"));

    let update = lunch(dir, &db, &["record", "update", "1", "value=69", "example_field=dev"]);
    assert_ok(&update);
    assert!(stdout(&update).contains("Updated record 1"));

    let get = lunch(dir, &db, &["record", "get", "1"]);
    assert_ok(&get);
    let out = stdout(&get);
    assert!(out.contains("value=69"));
    assert!(out.contains("example_field=dev"));

    let bad_column = lunch(dir, &db, &["record", "update", "1", "id=5"]);
    assert!(!bad_column.status.success());

    let count = lunch(dir, &db, &["record", "count"]);
    assert_eq!(stdout(&count).trim(), "1");

    let delete = lunch(dir, &db, &["record", "delete", "1"]);
    assert_ok(&delete);

    let count = lunch(dir, &db, &["record", "count"]);
    assert_eq!(stdout(&count).trim(), "0");

    let missing = lunch(dir, &db, &["record", "get", "1"]);
    assert!(!missing.status.success());
}

#[test]
fn test_config_file_supplies_database_path() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("from_config.db");
    fs::write(
        temp_dir.path().join("lunch.toml"),
        format!("db_path = {:?}\nsample_data = true\n", db_path.to_str().unwrap()),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_lunch"))
        .current_dir(temp_dir.path())
        .env_remove("LUNCH_DB")
        .env_remove("LUNCH_LOG")
        .env_remove("LUNCH_CONFIG")
        .arg("init")
        .output()
        .expect("Failed to execute CLI");
    assert_ok(&output);
    assert!(stdout(&output).contains("Added 4 sample meals"));
    assert!(db_path.exists());

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let meals: i64 = conn
        .query_row("SELECT COUNT(*) FROM meals", [], |row| row.get(0))
        .unwrap();
    assert_eq!(meals, 4);
}
