//! # Database Error Types
//!
//! Error types for receipt persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError { code: PERSISTENCE_ERROR } (register app)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Operator sees the message; finalize stops before rendering            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use remito_core::CoreError;
use thiserror::Error;

/// Database operation errors.
///
/// Every variant is a persistence failure as far as the finalize flow is
/// concerned: nothing was saved, so nothing may be rendered.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - A receipt number that is already persisted is saved again
    ///   (two processes racing on the same file)
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - File permissions issue, file locked
    /// - The pool was closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    ///
    /// ## When This Occurs
    /// - CHECK constraint rejected a row
    /// - Disk full, I/O error
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started or committed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (the single connection is busy).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A stored row cannot be turned back into a domain value.
    #[error("Corrupt {entity} record: {detail}")]
    CorruptRecord { entity: String, detail: String },

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a CorruptRecord error.
    pub fn corrupt(entity: impl Into<String>, detail: impl Into<String>) -> Self {
        DbError::CorruptRecord {
            entity: entity.into(),
            detail: detail.into(),
        }
    }

    /// Names the value that broke a unique constraint.
    ///
    /// sqlite only reports the column, so callers that know the value fill
    /// it in. Other variants pass through unchanged.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        match self {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: value.into(),
            },
            other => other,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: receipts.number"
                // "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Sequence Error
// =============================================================================

/// Failure to allocate the next receipt number.
///
/// Kept apart from [`DbError`] so a corrupt history is never mistaken for an
/// unreachable store.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// History could not be read.
    #[error(transparent)]
    Store(#[from] DbError),

    /// History was read but the last number does not parse.
    #[error(transparent)]
    Malformed(#[from] CoreError),
}

/// Result type for sequence allocation.
pub type SequenceResult<T> = Result<T, SequenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_closed_is_connection_failure() {
        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[test]
    fn test_with_value_fills_unique_violation() {
        let err = DbError::UniqueViolation {
            field: "receipts.number".to_string(),
            value: "unknown".to_string(),
        }
        .with_value("0042");
        assert_eq!(
            err.to_string(),
            "Duplicate receipts.number: '0042' already exists"
        );

        let err = DbError::PoolExhausted.with_value("0042");
        assert!(matches!(err, DbError::PoolExhausted));
    }

    #[test]
    fn test_sequence_error_keeps_core_message() {
        let err: SequenceError = CoreError::MalformedSequence {
            stored: "X1".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Stored receipt number 'X1' is not a valid sequence number"
        );
    }
}
