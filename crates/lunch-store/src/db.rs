//! Database connection management
//!
//! Provides connection helpers and [`Database`], a handle that caches one
//! SQLite connection per thread.

use crate::errors::{from_rusqlite, lock_poisoned, Result};
use crate::migrations::apply_migrations;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, ThreadId};
use std::time::Duration;

/// How long a connection waits on a lock held by another connection
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection: foreign keys on, busy timeout
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON")
        .map_err(from_rusqlite)?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;
    Ok(())
}

/// Switch a file database to WAL so readers on other threads don't block writers
pub fn enable_wal(conn: &Connection) -> Result<()> {
    // journal_mode answers with the resulting mode, so it has to be queried
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .map_err(from_rusqlite)
}

type SharedConnection = Arc<Mutex<Connection>>;
type ConnectionCache = Mutex<HashMap<ThreadId, SharedConnection>>;

thread_local! {
    static RELEASE_ON_EXIT: RefCell<Vec<CacheSlot>> = const { RefCell::new(Vec::new()) };
}

/// A thread's entry in one `Database` cache, removed when the thread exits
struct CacheSlot {
    cache: Weak<ConnectionCache>,
    thread: ThreadId,
}

impl Drop for CacheSlot {
    fn drop(&mut self) {
        let Some(cache) = self.cache.upgrade() else {
            return;
        };
        if let Ok(mut connections) = cache.lock() {
            connections.remove(&self.thread);
        };
    }
}

/// Drop the calling thread's entry in `cache` once the thread finishes.
///
/// Must be called without holding the cache lock. A thread whose locals are
/// already being torn down gets its entry dropped right away.
fn release_on_thread_exit(cache: &Arc<ConnectionCache>) {
    let weak = Arc::downgrade(cache);
    let thread = thread::current().id();
    let registered = RELEASE_ON_EXIT.try_with(|slots| {
        let mut slots = slots.borrow_mut();
        slots.retain(|held| held.cache.strong_count() > 0);
        if !slots.iter().any(|held| held.cache.ptr_eq(&weak)) {
            slots.push(CacheSlot {
                cache: weak.clone(),
                thread,
            });
        }
    });
    if registered.is_err() {
        if let Ok(mut connections) = cache.lock() {
            connections.remove(&thread);
        }
    }
}

/// True for paths SQLite opens as a private in-memory or temporary database
fn is_private_database(path: &Path) -> bool {
    path.as_os_str().is_empty() || path.as_os_str() == ":memory:"
}

enum Location {
    File(PathBuf),
    Memory(SharedConnection),
}

/// Handle to the lunch database
///
/// File databases get one lazily opened connection per calling thread,
/// reused for every later call on that thread and closed when the thread
/// exits. An in-memory database exists only inside the connection that
/// created it, so all threads share that single connection.
///
/// The schema is migrated once, when the handle is opened.
pub struct Database {
    location: Location,
    connections: Arc<ConnectionCache>,
}

impl Database {
    /// Open (creating if needed) and migrate a database file.
    ///
    /// `":memory:"` and the empty path give the same shared in-memory
    /// database as [`Database::open_in_memory`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if is_private_database(path) {
            return Self::open_in_memory();
        }

        let path = path.to_path_buf();
        let mut conn = open(&path)?;
        configure(&conn)?;
        enable_wal(&conn)?;
        apply_migrations(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened database");

        let mut cache = HashMap::new();
        cache.insert(thread::current().id(), Arc::new(Mutex::new(conn)));
        let connections = Arc::new(Mutex::new(cache));
        release_on_thread_exit(&connections);

        Ok(Self {
            location: Location::File(path),
            connections,
        })
    }

    /// Open a fresh, migrated in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = open_in_memory()?;
        configure(&conn)?;
        apply_migrations(&mut conn)?;

        Ok(Self {
            location: Location::Memory(Arc::new(Mutex::new(conn))),
            connections: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Path of the database file; `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory(_) => None,
        }
    }

    /// Number of per-thread connections currently cached, one per live
    /// thread that has used the handle
    pub fn cached_connections(&self) -> usize {
        match &self.location {
            Location::Memory(_) => 1,
            Location::File(_) => self.connections.lock().map(|c| c.len()).unwrap_or(0),
        }
    }

    fn connection(&self) -> Result<SharedConnection> {
        let path = match &self.location {
            Location::Memory(shared) => return Ok(shared.clone()),
            Location::File(path) => path,
        };

        let mut connections = self.connections.lock().map_err(|_| lock_poisoned())?;
        let thread_id = thread::current().id();
        if let Some(conn) = connections.get(&thread_id) {
            return Ok(conn.clone());
        }

        let conn = open(path)?;
        configure(&conn)?;
        enable_wal(&conn)?;
        tracing::debug!(thread = ?thread_id, "opened connection for thread");
        let conn = Arc::new(Mutex::new(conn));
        connections.insert(thread_id, conn.clone());
        drop(connections);
        release_on_thread_exit(&self.connections);
        Ok(conn)
    }

    /// Run `f` against the calling thread's connection
    pub fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let conn = self.connection()?;
        let mut guard = conn.lock().map_err(|_| lock_poisoned())?;
        f(&mut guard)
    }

    /// Run `f` inside a transaction: committed when `f` returns `Ok`, rolled
    /// back when it returns `Err`.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`), so a
    /// read-modify-write inside `f` waits for other writers instead of
    /// failing on upgrade.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.with_conn(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(from_rusqlite)?;
            let value = f(&tx)?;
            tx.commit().map_err(from_rusqlite)?;
            Ok(value)
        })
    }

    /// Drop every cached per-thread connection.
    ///
    /// File databases reopen lazily on the next call. The shared connection
    /// of an in-memory database is kept, since dropping it would drop the data.
    pub fn close(&self) {
        if let Ok(mut connections) = self.connections.lock() {
            connections.clear();
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path())
            .field("cached_connections", &self.cached_connections())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunch_core::errors::{ExError, ExErrorKind};

    #[test]
    fn test_in_memory_is_migrated() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM meals", [], |row| row.get(0))
                    .map_err(from_rusqlite)
            })
            .unwrap();
        assert_eq!(count, 0);
        assert!(db.path().is_none());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();
        let result: Result<()> = db.transaction(|tx| {
            tx.execute(
                "INSERT INTO records (name, created_at) VALUES ('temp', 0)",
                [],
            )
            .map_err(from_rusqlite)?;
            Err(ExError::new(ExErrorKind::Internal).with_message("abort"))
        });
        assert!(result.is_err());

        let count: i64 = db
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
                    .map_err(from_rusqlite)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO transactions (student_id, meal_id, date, created_at)
                     VALUES (99, 99, '2025-01-01', 0)",
                    [],
                )
                .map_err(from_rusqlite)
            })
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    }
}
