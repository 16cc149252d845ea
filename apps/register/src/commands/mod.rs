//! # Register Commands Module
//!
//! Operations the console surface drives.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── item.rs     ◄─── Add, remove, and view line items
//! └── receipt.rs  ◄─── Start and finalize receipt sessions
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  console line  "add 2 500 Hammer"                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  add_item(&receipt, &config, "2", "Hammer", "500")                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<ReceiptView, ApiError>                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  console prints the view, or the error message                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes only the state it needs.

pub mod item;
pub mod receipt;

pub use item::{add_item, current_receipt, remove_selected, LineView, ReceiptView};
pub use receipt::{finalize_session, start_new_session, FinalizeResponse};
