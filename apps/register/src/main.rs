//! # Remito Register Entry Point
//!
//! ```text
//! remito [CONFIG]
//! ```
//!
//! `CONFIG` is an optional path to a `remito.toml`; without it the working
//! directory and then the platform config directory are searched.

use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    remito_register_lib::init_tracing();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    match remito_register_lib::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = ?err.code, "Register stopped");
            eprintln!("remito: {}", err.message);
            ExitCode::FAILURE
        }
    }
}
