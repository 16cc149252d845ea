//! # remito-core: Pure Business Logic for Remito
//!
//! This crate is the **heart** of the receipt register. It contains the
//! receipt lifecycle rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Remito Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Operator surface (console)                      │   │
//! │  │      add item ──► remove item ──► new receipt ──► finalize      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ remito-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │  session  │  │   │
//! │  │   │ LineItem  │  │   Money   │  │  Ledger   │  │  Session  │  │   │
//! │  │   │ ReceiptNo │  │ Currency  │  │  LineId   │  │  states   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                   │                   │
//! │  ┌──────────────▼──────────────┐   ┌────────────────▼──────────────┐   │
//! │  │   remito-db (Store)         │   │   remito-render (Renderer)    │   │
//! │  └─────────────────────────────┘   └───────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, ReceiptNumber, FinalizedReceipt)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - In-memory line item ledger with running total
//! - [`session`] - Receipt session state machine
//! - [`validation`] - Operator input parsing and validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use remito_core::{Ledger, Money};
//!
//! let mut ledger = Ledger::new();
//! ledger.add_parsed("2", "Hammer", "500").unwrap();
//! ledger.add_parsed("1", "Nail box", "150").unwrap();
//!
//! assert_eq!(ledger.total(), Money::from_major(1150));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::Ledger;
pub use money::{CurrencyFormat, Money};
pub use session::{FinalizeStep, Session, SessionState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum number of digits a receipt number is displayed with.
///
/// Wider numbers are shown in full; there is no rollover.
pub const RECEIPT_NUMBER_WIDTH: usize = 4;

/// Maximum length of a product description, in characters.
pub const MAX_PRODUCT_LEN: usize = 200;
