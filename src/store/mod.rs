//! SQLite-backed override storage.

pub mod extensions;

use crate::error::Result;
use crate::overrides::Extension;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Persistence boundary consumed by the resolver and writer.
pub trait OverrideStore {
    /// Fetch the stored tree for `(name, namespace)`, if any.
    fn find(&self, name: &str, namespace: &str) -> Result<Option<Extension>>;

    /// Replace the stored tree for the extension's `(name, namespace)` key
    /// with its current nodes, returning the extension row id.
    ///
    /// Delete-then-insert over the whole prior subtree, executed inside a
    /// single transaction: readers observe either the old tree or the new
    /// one, never a partially deleted state.
    fn replace(&self, extension: &Extension) -> Result<i64>;
}

/// Store handle wrapping a SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL for concurrent readers during a replace
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    fn run_migrations(&self) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        embedded::migrations::runner().run(&mut *conn)?;
        Ok(())
    }

    /// Execute a function with shared access to the connection.
    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }

    /// Execute a function with mutable access to the connection (for
    /// transactions).
    pub(crate) fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().unwrap();
        f(&mut conn)
    }
}

impl OverrideStore for Database {
    fn find(&self, name: &str, namespace: &str) -> Result<Option<Extension>> {
        self.find_extension(name, namespace)
    }

    fn replace(&self, extension: &Extension) -> Result<i64> {
        self.replace_extension(extension)
    }
}

/// Current timestamp in milliseconds.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
