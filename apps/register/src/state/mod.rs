//! # State Module
//!
//! Shared state handed to register commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │  ReceiptState    │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  Arc<Mutex<      │  │  RegisterConfig  │          │
//! │  │  (SQLite     │  │   Option<        │  │  ReceiptRenderer │          │
//! │  │   pool)      │  │    Session>>>    │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool                      │
//! │  • ReceiptState: async Mutex, held across save and render              │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod receipt;

pub use config::{
    ConfigError, ConfigResult, ConfigState, DocumentSection, RegisterConfig, StoreSection,
    CONFIG_FILE_NAME,
};
pub use db::DbState;
pub use receipt::ReceiptState;
