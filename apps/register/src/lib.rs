//! # remito-register: Console Receipt Register
//!
//! Wires configuration, the receipt store, and the renderer to a
//! line-oriented console.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Remito Register                                  │
//! │                                                                         │
//! │  stdin ──► console ──► commands/ ──┬──► remito-core   (Session)         │
//! │                                    ├──► remito-db     (save, sequence)  │
//! │  stdout ◄── console ◄──────────────┴──► remito-render (PDF)            │
//! │                                                                         │
//! │  stderr ◄── tracing                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load `remito.toml`
//! 3. Connect to the receipt store & run migrations
//! 4. Create state objects (DbState, ReceiptState, ConfigState)
//! 5. Run the console until `quit` or end of input

pub mod commands;
pub mod console;
pub mod error;
pub mod state;

use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use remito_db::{Database, DbConfig};

use console::Console;
use error::ApiError;
use state::{ConfigState, DbState, ReceiptState, RegisterConfig};

/// Runs the register.
///
/// `config_path` overrides the `remito.toml` lookup.
pub async fn run(config_path: Option<PathBuf>) -> Result<(), ApiError> {
    let config = RegisterConfig::load(config_path)?;
    info!(
        database = %config.store.database_path.display(),
        output_dir = %config.document.output_dir.display(),
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(config.store.database_path.clone())).await?;
    info!("Receipt store ready");

    let db_state = DbState::new(db);
    let receipt_state = ReceiptState::new();
    let config_state = ConfigState::new(config);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let result = Console::new(&db_state, &receipt_state, &config_state)
        .run(stdin, stdout)
        .await
        .map_err(|e| ApiError::internal(format!("Console I/O failed: {}", e)));

    db_state.inner().close().await;
    result
}

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,remito=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never mix with console output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=remito_db=trace` - Trace the store only
/// - Default: INFO, DEBUG for remito crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    subscriber(filter).init();
}

fn subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_default_filter_levels() {
        let subscriber = subscriber(EnvFilter::new(DEFAULT_LOG_FILTER));

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "remito_db::pool", Level::DEBUG));
            assert!(!tracing::enabled!(target: "remito_db::pool", Level::TRACE));
            assert!(tracing::enabled!(target: "sqlx::query", Level::WARN));
            assert!(!tracing::enabled!(target: "sqlx::query", Level::DEBUG));
            assert!(!tracing::enabled!(target: "hyper", Level::DEBUG));
        });
    }
}
