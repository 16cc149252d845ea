//! # Error Types
//!
//! Domain-specific error types for remito-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  remito-core errors (this file)                                        │
//! │  ├── CoreError        - Receipt lifecycle errors                       │
//! │  └── ValidationError  - Operator input failures                        │
//! │                                                                         │
//! │  remito-db errors (separate crate)                                     │
//! │  └── DbError          - Persistence failures                           │
//! │                                                                         │
//! │  remito-render errors (separate crate)                                 │
//! │  └── RenderError      - Document generation failures                   │
//! │                                                                         │
//! │  Register app errors                                                   │
//! │  └── ApiError         - What the operator sees                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Receipt lifecycle errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Operator entered a line item that cannot be accepted.
    ///
    /// ## When This Occurs
    /// - Quantity or price text is not a number
    /// - Quantity is zero or negative, price is negative
    /// - Product description is blank
    ///
    /// The ledger is left untouched so the operator can correct and retry.
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] ValidationError),

    /// Finalize was requested on a receipt with no line items.
    #[error("Receipt has no items")]
    EmptyReceipt,

    /// The last persisted receipt number cannot be parsed.
    ///
    /// Number allocation halts instead of guessing a replacement.
    #[error("Stored receipt number '{stored}' is not a valid sequence number")]
    MalformedSequence { stored: String },

    /// The session no longer accepts the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding or removing items after the receipt was saved
    /// - Finalizing a receipt that is already finalized
    #[error("Receipt {number} is {state}, cannot perform operation")]
    SessionClosed { number: String, state: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Text is not a number.
    #[error("{field} '{value}' is not a valid number")]
    NotANumber { field: String, value: String },

    /// Arithmetic result does not fit.
    #[error("{field} is too large")]
    Overflow { field: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn not_a_number(field: &str, value: &str) -> Self {
        ValidationError::NotANumber {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::MalformedSequence {
            stored: "A12".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Stored receipt number 'A12' is not a valid sequence number"
        );
        assert_eq!(CoreError::EmptyReceipt.to_string(), "Receipt has no items");
    }

    #[test]
    fn test_validation_converts_to_invalid_item() {
        let core_err: CoreError = ValidationError::not_a_number("price", "abc").into();
        assert!(matches!(core_err, CoreError::InvalidItem(_)));
        assert_eq!(
            core_err.to_string(),
            "Invalid item: price 'abc' is not a valid number"
        );
    }
}
