// Integration tests for students, meals, the schedule and ratings

use chrono::NaiveDate;
use lunch_core::errors::ExErrorKind;
use lunch_core::model::{MealPatch, NewMeal, NewStudent, StudentPatch};
use lunch_core::rating::Score;
use lunch_store::{MealRepo, RatingRepo, StudentRepo};
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    lunch_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn score(v: f64) -> Score {
    Score::new(v).unwrap()
}

#[test]
fn test_login_by_name_is_case_insensitive() {
    let conn = setup_test_db();
    let id = StudentRepo::add_student(
        &conn,
        &NewStudent::new("Lerato Mokoena").with_grade("7").with_class("7B"),
    )
    .unwrap();

    let found = StudentRepo::find_student_by_name(&conn, "  lerato MOKOENA ")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.class.as_deref(), Some("7B"));

    assert!(StudentRepo::find_student_by_name(&conn, "Lerato")
        .unwrap()
        .is_none());
}

#[test]
fn test_login_lookup_folds_ascii_case_only() {
    let conn = setup_test_db();
    let id = StudentRepo::add_student(&conn, &NewStudent::new("Åsa Lindqvist")).unwrap();

    // Exact spelling and ASCII-only case changes match
    let found = StudentRepo::find_student_by_name(&conn, "Åsa Lindqvist")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);
    let found = StudentRepo::find_student_by_name(&conn, "Åsa LINDQVIST")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);

    // Non-ASCII letters are compared as-is: the same Å matches, å does not
    assert!(StudentRepo::find_student_by_name(&conn, "ÅSA LINDQVIST")
        .unwrap()
        .is_some());
    assert!(StudentRepo::find_student_by_name(&conn, "åsa lindqvist")
        .unwrap()
        .is_none());
}

#[test]
fn test_blank_student_name_rejected() {
    let conn = setup_test_db();
    let err = StudentRepo::add_student(&conn, &NewStudent::new("   ")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(StudentRepo::count_students(&conn).unwrap(), 0);
}

#[test]
fn test_student_update_and_search() {
    let conn = setup_test_db();
    let id = StudentRepo::add_student(&conn, &NewStudent::new("Zed").with_grade("5")).unwrap();
    StudentRepo::add_student(&conn, &NewStudent::new("Amy").with_grade("6")).unwrap();

    let patch = StudentPatch::from_pairs([("class", "5A"), ("allergies", "peanuts")]).unwrap();
    assert!(StudentRepo::update_student(&conn, id, &patch).unwrap());

    let student = StudentRepo::get_student(&conn, id).unwrap().unwrap();
    assert_eq!(student.allergies.as_deref(), Some("peanuts"));

    let names: Vec<String> = StudentRepo::get_all_students(&conn)
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Amy", "Zed"]);

    let found = StudentRepo::search_students(&conn, "5a").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
}

#[test]
fn test_meal_validation() {
    let conn = setup_test_db();
    let err = MealRepo::add_meal(&conn, &NewMeal::new("Soup", -1.0)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    let err = MealRepo::add_meal(&conn, &NewMeal::new("Soup", f64::NAN)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_new_meal_is_unrated() {
    let conn = setup_test_db();
    let id = MealRepo::add_meal(&conn, &NewMeal::new("Soup", 15.0).with_category("starter"))
        .unwrap();
    let meal = MealRepo::get_meal(&conn, id).unwrap().unwrap();
    assert_eq!(meal.rating, 0.0);
    assert_eq!(meal.rating_count, 0);
    assert!(!meal.rating_summary().is_rated());
}

#[test]
fn test_update_meal_and_category_lookup() {
    let conn = setup_test_db();
    let id = MealRepo::add_meal(&conn, &NewMeal::new("Soup", 15.0).with_category("starter"))
        .unwrap();

    let patch = MealPatch::from_pairs([("price", "18.5")]).unwrap();
    assert!(MealRepo::update_meal(&conn, id, &patch).unwrap());
    assert_eq!(MealRepo::get_meal(&conn, id).unwrap().unwrap().price, 18.5);

    assert_eq!(
        MealRepo::get_meals_by_category(&conn, "STARTER").unwrap().len(),
        1
    );
    assert!(MealRepo::find_meal(&conn, "Soup", Some("starter"))
        .unwrap()
        .is_some());
    assert!(MealRepo::find_meal(&conn, "Soup", Some("main"))
        .unwrap()
        .is_none());
}

#[test]
fn test_schedule_and_meals_by_date() {
    let conn = setup_test_db();
    let soup = MealRepo::add_meal(&conn, &NewMeal::new("Soup", 15.0)).unwrap();
    let bread = MealRepo::add_meal(&conn, &NewMeal::new("Bread", 5.0)).unwrap();

    MealRepo::schedule_meal(&conn, soup, date("2025-03-03"), 30).unwrap();
    MealRepo::schedule_meal(&conn, bread, date("2025-03-03"), 50).unwrap();
    MealRepo::schedule_meal(&conn, soup, date("2025-03-04"), 10).unwrap();

    let monday = MealRepo::get_meals_by_date(&conn, date("2025-03-03")).unwrap();
    assert_eq!(monday.len(), 2);
    assert_eq!(monday[0].meal.name, "Bread");
    assert_eq!(monday[0].available_quantity, 50);
    assert_eq!(monday[1].meal.id, soup);

    assert!(MealRepo::get_meals_by_date(&conn, date("2025-03-05"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_schedule_rejects_unknown_meal_and_negative_quantity() {
    let conn = setup_test_db();
    let err = MealRepo::schedule_meal(&conn, 42, date("2025-03-03"), 1).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);

    let soup = MealRepo::add_meal(&conn, &NewMeal::new("Soup", 15.0)).unwrap();
    let err = MealRepo::schedule_meal(&conn, soup, date("2025-03-03"), -1).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_rating_sequence_updates_running_average() {
    let conn = setup_test_db();
    let id = MealRepo::add_meal(&conn, &NewMeal::new("Pasta", 45.0)).unwrap();

    let first = RatingRepo::rate_meal(&conn, id, score(4.0), None, None).unwrap();
    assert_eq!(first.count, 1);
    assert_eq!(first.average, 4.0);

    RatingRepo::rate_meal(&conn, id, score(5.0), None, None).unwrap();
    let third = RatingRepo::rate_meal(&conn, id, score(3.0), None, Some("a bit cold")).unwrap();
    assert_eq!(third.count, 3);
    assert!((third.average - 4.0).abs() < 1e-9);

    let meal = MealRepo::get_meal(&conn, id).unwrap().unwrap();
    assert_eq!(meal.rating_count, 3);
    assert!((meal.rating - 4.0).abs() < 1e-9);

    let ratings = RatingRepo::get_meal_ratings(&conn, id).unwrap();
    assert_eq!(ratings.len(), 3);
    assert_eq!(ratings[0].comment.as_deref(), Some("a bit cold"));
}

#[test]
fn test_rating_folds_into_existing_summary() {
    let conn = setup_test_db();
    let id = MealRepo::add_meal(&conn, &NewMeal::new("Pasta", 45.0)).unwrap();
    conn.execute(
        "UPDATE meals SET rating = 4.5, rating_count = 10 WHERE id = ?1",
        [id],
    )
    .unwrap();

    let summary = RatingRepo::rate_meal(&conn, id, score(1.0), None, None).unwrap();
    assert_eq!(summary.count, 11);
    assert!((summary.average - 46.0 / 11.0).abs() < 1e-9);
}

#[test]
fn test_rating_unknown_meal_is_not_found() {
    let conn = setup_test_db();
    let err = RatingRepo::rate_meal(&conn, 7, score(3.0), None, None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_rating_unknown_student_changes_nothing() {
    let mut conn = setup_test_db();
    let id = MealRepo::add_meal(&conn, &NewMeal::new("Pasta", 45.0)).unwrap();

    let tx = conn.transaction().unwrap();
    let err = RatingRepo::rate_meal(&tx, id, score(3.0), Some(99), None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    drop(tx);

    let meal = MealRepo::get_meal(&conn, id).unwrap().unwrap();
    assert_eq!(meal.rating_count, 0);
    assert!(RatingRepo::get_meal_ratings(&conn, id).unwrap().is_empty());
}
