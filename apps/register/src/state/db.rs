//! # Database State
//!
//! Wraps the `Database` connection for use in register commands.
//!
//! The `SqlitePool` inside `Database` is thread-safe, so no extra locking.

use remito_db::Database;

/// Wrapper around `Database` for command state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
