// Integration tests for the per-thread connection cache

use lunch_core::model::{NewMeal, NewRecord};
use lunch_core::rating::Score;
use lunch_store::{Database, MealRepo, RatingRepo, RecordRepo};
use std::sync::Arc;
use std::thread;

#[test]
fn test_each_thread_gets_its_own_connection() {
    // Given: A file database opened on this thread
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::open(dir.path().join("lunch.db")).unwrap());
    assert_eq!(db.cached_connections(), 1);

    // When: Four threads each write a record, twice
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                for n in 0..2 {
                    db.with_conn(|conn| {
                        RecordRepo::add_record(conn, &NewRecord::new(format!("t{}-{}", i, n)))
                    })
                    .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Then: Every write landed, and the finished threads' connections are gone
    let count = db.with_conn(|conn| RecordRepo::get_record_count(conn)).unwrap();
    assert_eq!(count, 8);
    assert_eq!(db.cached_connections(), 1);

    // And: close drops the cache, later calls reopen lazily
    db.close();
    assert_eq!(db.cached_connections(), 0);
    let count = db.with_conn(|conn| RecordRepo::get_record_count(conn)).unwrap();
    assert_eq!(count, 8);
    assert_eq!(db.cached_connections(), 1);
}

#[test]
fn test_finished_threads_release_their_connections() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::open(dir.path().join("lunch.db")).unwrap());

    for i in 0..50 {
        let worker = Arc::clone(&db);
        thread::spawn(move || {
            worker
                .with_conn(|conn| RecordRepo::add_record(conn, &NewRecord::new(format!("r{}", i))))
                .unwrap();
            assert_eq!(worker.cached_connections(), 2);
        })
        .join()
        .unwrap();
    }

    assert_eq!(db.cached_connections(), 1);
    let count = db.with_conn(|conn| RecordRepo::get_record_count(conn)).unwrap();
    assert_eq!(count, 50);
}

#[test]
fn test_thread_reconnecting_after_close_keeps_its_connection() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::open(dir.path().join("lunch.db")).unwrap());

    let worker = Arc::clone(&db);
    thread::spawn(move || {
        worker.with_conn(|conn| RecordRepo::get_record_count(conn)).unwrap();
        worker.close();
        worker.with_conn(|conn| RecordRepo::get_record_count(conn)).unwrap();
        worker.with_conn(|conn| RecordRepo::get_record_count(conn)).unwrap();
        assert_eq!(worker.cached_connections(), 1);
    })
    .join()
    .unwrap();

    assert_eq!(db.cached_connections(), 0);
}

#[test]
fn test_concurrent_ratings_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::open(dir.path().join("lunch.db")).unwrap());
    let meal_id = db
        .with_conn(|conn| MealRepo::add_meal(conn, &NewMeal::new("Pasta", 45.0)))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                for _ in 0..5 {
                    db.transaction(|tx| {
                        RatingRepo::rate_meal(tx, meal_id, Score::new(4.0).unwrap(), None, None)
                    })
                    .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let meal = db
        .with_conn(|conn| MealRepo::get_meal(conn, meal_id))
        .unwrap()
        .unwrap();
    assert_eq!(meal.rating_count, 20);
    assert!((meal.rating - 4.0).abs() < 1e-9);
}

#[test]
fn test_in_memory_database_is_shared_across_threads() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let writer = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            db.with_conn(|conn| RecordRepo::add_record(conn, &NewRecord::new("from thread")))
                .unwrap()
        })
    };
    let id = writer.join().unwrap();

    let record = db
        .with_conn(|conn| RecordRepo::get_record(conn, id))
        .unwrap()
        .unwrap();
    assert_eq!(record.name, "from thread");
}

#[test]
fn test_memory_path_opens_shared_in_memory_database() {
    for path in [":memory:", ""] {
        let db = Arc::new(Database::open(path).unwrap());
        assert!(db.path().is_none());

        db.with_conn(|conn| RecordRepo::add_record(conn, &NewRecord::new("main")))
            .unwrap();

        let reader = Arc::clone(&db);
        let count = thread::spawn(move || {
            reader
                .with_conn(|conn| RecordRepo::get_record_count(conn))
                .unwrap()
        })
        .join()
        .unwrap();
        assert_eq!(count, 1, "path {:?}", path);
    }
}
