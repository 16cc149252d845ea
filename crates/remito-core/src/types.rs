//! # Domain Types
//!
//! Core domain types used throughout Remito.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │  ReceiptNumber  │   │    LineItem     │   │  FinalizedReceipt    │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  u64            │   │  quantity       │   │  number              │  │
//! │  │  "0001" display │   │  product        │   │  issued_on           │  │
//! │  │                 │   │  unit_price     │   │  items (by value)    │  │
//! │  │                 │   │  subtotal       │   │  total               │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `FinalizedReceipt` is the single value handed to both the store and the
//! renderer, so what is saved and what is printed cannot diverge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::RECEIPT_NUMBER_WIDTH;

// =============================================================================
// Receipt Number
// =============================================================================

/// Sequential receipt number.
///
/// Displayed zero-padded to at least four digits; larger values widen
/// (`9999` is followed by `10000`).
///
/// ## Example
/// ```rust
/// use remito_core::ReceiptNumber;
///
/// let first = ReceiptNumber::first();
/// assert_eq!(first.to_string(), "0001");
///
/// let next = ReceiptNumber::parse("0041").unwrap().next().unwrap();
/// assert_eq!(next.to_string(), "0042");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptNumber(u64);

impl ReceiptNumber {
    /// The number issued when no receipt has ever been persisted.
    #[inline]
    pub const fn first() -> Self {
        ReceiptNumber(1)
    }

    #[inline]
    pub const fn new(value: u64) -> Self {
        ReceiptNumber(value)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Parses a stored receipt number.
    ///
    /// Anything that is not a plain decimal integer is a
    /// [`CoreError::MalformedSequence`]; the caller must not fall back to
    /// [`ReceiptNumber::first`].
    pub fn parse(stored: &str) -> CoreResult<Self> {
        let trimmed = stored.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::MalformedSequence {
                stored: stored.to_string(),
            });
        }

        trimmed
            .parse::<u64>()
            .map(ReceiptNumber)
            .map_err(|_| CoreError::MalformedSequence {
                stored: stored.to_string(),
            })
    }

    /// Number to issue next, given the most recently persisted one.
    ///
    /// No history yields [`ReceiptNumber::first`]. A stored number that does
    /// not parse halts allocation with `MalformedSequence`.
    ///
    /// ```rust
    /// use remito_core::ReceiptNumber;
    ///
    /// assert_eq!(ReceiptNumber::following(None).unwrap().to_string(), "0001");
    /// assert_eq!(ReceiptNumber::following(Some("0001")).unwrap().to_string(), "0002");
    /// assert!(ReceiptNumber::following(Some("N/A")).is_err());
    /// ```
    pub fn following(last: Option<&str>) -> CoreResult<Self> {
        match last {
            None => Ok(ReceiptNumber::first()),
            Some(stored) => ReceiptNumber::parse(stored)?.next(),
        }
    }

    /// Returns the number that follows this one.
    pub fn next(&self) -> CoreResult<Self> {
        self.0
            .checked_add(1)
            .map(ReceiptNumber)
            .ok_or_else(|| CoreError::MalformedSequence {
                stored: self.to_string(),
            })
    }
}

impl fmt::Display for ReceiptNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = RECEIPT_NUMBER_WIDTH)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry on a receipt.
///
/// Immutable once built: the only way to change a line is to remove it from
/// the ledger and add a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    quantity: i64,
    product: String,
    unit_price: Money,
    subtotal: Money,
}

impl LineItem {
    /// Builds a line item, computing `subtotal = quantity × unit_price`.
    ///
    /// ## Rules
    /// - quantity > 0
    /// - unit_price >= 0 (zero is a free item)
    /// - product is not blank (it is stored trimmed)
    pub fn new(
        quantity: i64,
        product: impl Into<String>,
        unit_price: Money,
    ) -> Result<Self, ValidationError> {
        crate::validation::validate_quantity(quantity)?;
        crate::validation::validate_unit_price(unit_price)?;
        let product = crate::validation::validate_product(&product.into())?;

        let subtotal = unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| ValidationError::Overflow {
                field: "subtotal".to_string(),
            })?;

        Ok(LineItem {
            quantity,
            product,
            unit_price,
            subtotal,
        })
    }

    /// Rebuilds a line item from stored columns without recomputing anything.
    ///
    /// Used by the store when loading history; the stored subtotal is taken
    /// as-is so that a round trip reproduces exactly what was saved.
    pub fn from_parts(quantity: i64, product: String, unit_price: Money, subtotal: Money) -> Self {
        LineItem {
            quantity,
            product,
            unit_price,
            subtotal,
        }
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    #[inline]
    pub fn product(&self) -> &str {
        &self.product
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }
}

/// Handle of a line inside one ledger.
///
/// Handles are never reused, so a stale selection cannot remove the wrong line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Finalized Receipt
// =============================================================================

/// A receipt frozen at finalize time.
///
/// Owns its line items by value. This is exactly what gets persisted and
/// exactly what gets rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedReceipt {
    pub number: ReceiptNumber,
    pub issued_on: NaiveDate,
    pub items: Vec<LineItem>,
    pub total: Money,
}

impl FinalizedReceipt {
    /// Sum of the line subtotals, computed independently of `total`.
    pub fn recomputed_total(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
