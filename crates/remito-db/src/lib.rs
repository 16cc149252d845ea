//! # remito-db: Database Layer for Remito
//!
//! Durable storage of finalized receipts on SQLite, plus the sequencer that
//! derives receipt numbers from that history.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Remito Data Flow                                 │
//! │                                                                         │
//! │  start_new_session ─────────────┐      finalize_session                │
//! │                                 │             │                         │
//! │  ┌──────────────────────────────▼─────────────▼────────────────────┐   │
//! │  │                     remito-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌──────────────┐ │   │
//! │  │   │   Database    │    │ ReceiptRepository│   │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│ Sequencer        │   │  (embedded)  │ │   │
//! │  │   └───────────────┘    └──────────────────┘   └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (remitos.db)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use remito_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("remitos.db")).await?;
//!
//! let number = db.sequencer().next_number().await?;
//! // ... build the receipt ...
//! db.receipts().save(&receipt).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sequencer;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, SequenceError, SequenceResult};
pub use pool::{Database, DbConfig};
pub use repository::receipt::{PersistedReceipt, ReceiptRepository};
pub use sequencer::Sequencer;
