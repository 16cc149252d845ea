//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  Console                     Command layer                              │
//! │  ───────                     ─────────────                              │
//! │                                                                         │
//! │  > done                                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  finalize_session()  ->  Result<T, ApiError>                     │  │
//! │  │         │                                                        │  │
//! │  │         ├── CoreError::EmptyReceipt ────────► EMPTY_RECEIPT     │  │
//! │  │         ├── DbError::*  ────────────────────► PERSISTENCE_ERROR │  │
//! │  │         ├── RenderError::* ─────────────────► RENDER_ERROR      │  │
//! │  │         └── Success ──────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  error: [EmptyReceipt] Add at least one item before finalizing          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store and render failures are logged in full; the operator gets a short
//! message plus the code.

use serde::Serialize;

use remito_core::{CoreError, ReceiptNumber};
use remito_db::{DbError, SequenceError};
use remito_render::RenderError;

use crate::state::ConfigError;

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "EMPTY_RECEIPT",
///   "message": "Add at least one item before finalizing"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message for the operator
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Line item rejected; the ledger is unchanged
    InvalidItem,

    /// Finalize requested with no items
    EmptyReceipt,

    /// Stored receipt number cannot be continued
    MalformedSequence,

    /// The store could not be read or written
    PersistenceError,

    /// The receipt is saved but its document was not written
    RenderError,

    /// No session, or the session does not accept the operation
    InvalidState,

    /// Configuration file problem
    ConfigError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// No receipt session has been started.
    pub fn no_session() -> Self {
        ApiError::new(ErrorCode::InvalidState, "No receipt in progress")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Document generation failed for a receipt that is already saved.
    pub fn render(number: ReceiptNumber, err: RenderError) -> Self {
        tracing::error!(number = %number, error = %err, "Receipt document failed");
        ApiError::new(
            ErrorCode::RenderError,
            format!(
                "Receipt {} was saved but its document could not be written: {}. \
                 Run 'done' again to retry.",
                number, err
            ),
        )
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidItem(e) => ApiError::new(ErrorCode::InvalidItem, e.to_string()),
            CoreError::EmptyReceipt => ApiError::new(
                ErrorCode::EmptyReceipt,
                "Add at least one item before finalizing",
            ),
            CoreError::MalformedSequence { stored } => {
                tracing::error!(stored = %stored, "Malformed receipt sequence");
                ApiError::new(
                    ErrorCode::MalformedSequence,
                    format!(
                        "Last stored receipt number '{}' is not valid; cannot assign a new one",
                        stored
                    ),
                )
            }
            closed @ CoreError::SessionClosed { .. } => {
                ApiError::new(ErrorCode::InvalidState, closed.to_string())
            }
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let message = match &err {
            DbError::UniqueViolation { value, .. } => {
                format!("Receipt {} already exists in the store", value)
            }
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                "Receipt store is unavailable".to_string()
            }
            DbError::MigrationFailed(_) => "Receipt store could not be upgraded".to_string(),
            DbError::CorruptRecord { .. } => "Receipt store contains a damaged record".to_string(),
            DbError::ForeignKeyViolation { .. }
            | DbError::QueryFailed(_)
            | DbError::TransactionFailed(_)
            | DbError::Internal(_) => "Receipt could not be saved".to_string(),
        };

        // Log the actual error but return a generic message
        tracing::error!(error = %err, "Receipt store failure");
        ApiError::new(ErrorCode::PersistenceError, message)
    }
}

impl From<SequenceError> for ApiError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::Store(e) => e.into(),
            SequenceError::Malformed(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
