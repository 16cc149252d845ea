//! # Repository Module
//!
//! Database repository implementations for Remito.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  finalize_session                                                      │
//! │       │                                                                 │
//! │       │  db.receipts().save(&receipt)                                  │
//! │       ▼                                                                 │
//! │  ReceiptRepository                                                     │
//! │  ├── save(&self, receipt)          one transaction                     │
//! │  ├── latest(&self)                 highest internal id                 │
//! │  ├── latest_number(&self)          raw, for the sequencer              │
//! │  ├── get_by_number(&self, number)                                      │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite: receipts ◄── receipt_items (receipt_id FK)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod receipt;
