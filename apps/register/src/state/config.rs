//! # Configuration State
//!
//! Register configuration loaded once at startup from `remito.toml`.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Explicit path given by the caller
//! 2. `remito.toml` in the working directory
//! 3. `remito.toml` in the platform config directory
//! 4. Defaults (this file)
//!
//! ## Example File
//! ```toml
//! [store]
//! database_path = "remitos.db"
//!
//! [document]
//! output_dir = "remitos"
//! business_name = "Ferreteria San Miguel"
//! footer_message = "Thank you for your purchase!"
//!
//! [currency]
//! symbol = "$"
//! thousands_separator = "."
//! decimal_separator = ","
//! ```
//!
//! Read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use remito_core::CurrencyFormat;
use remito_render::{ReceiptRenderer, RenderSettings};

/// File name looked up in the working and config directories.
pub const CONFIG_FILE_NAME: &str = "remito.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Where receipts are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// SQLite file. Relative paths resolve against the working directory.
    pub database_path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            database_path: PathBuf::from("remitos.db"),
        }
    }
}

/// What the printed receipt looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSection {
    pub output_dir: PathBuf,
    pub business_name: String,
    pub footer_message: String,
}

impl Default for DocumentSection {
    fn default() -> Self {
        let render = RenderSettings::default();
        DocumentSection {
            output_dir: render.output_dir,
            business_name: render.business_name,
            footer_message: render.footer_message,
        }
    }
}

// =============================================================================
// Register Configuration
// =============================================================================

/// Complete register configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    pub store: StoreSection,
    pub document: DocumentSection,
    pub currency: CurrencyFormat,
}

impl RegisterConfig {
    /// Loads configuration from the first file found, or defaults.
    ///
    /// An explicit path that does not exist is an error; the implicit
    /// locations are optional.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::candidate_paths().into_iter().find(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Parses one TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(path = %path.display(), "Loading register config");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.document.business_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "document.business_name must not be empty".to_string(),
            ));
        }

        if self.currency.symbol.is_empty() {
            return Err(ConfigError::Invalid(
                "currency.symbol must not be empty".to_string(),
            ));
        }

        if self.currency.thousands_separator == self.currency.decimal_separator {
            return Err(ConfigError::Invalid(format!(
                "currency separators must differ, both are '{}'",
                self.currency.decimal_separator
            )));
        }

        if self.currency.decimal_separator.is_ascii_digit()
            || self.currency.thousands_separator.is_ascii_digit()
        {
            return Err(ConfigError::Invalid(
                "currency separators cannot be digits".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings handed to the renderer.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            output_dir: self.document.output_dir.clone(),
            business_name: self.document.business_name.clone(),
            footer_message: self.document.footer_message.clone(),
            currency: self.currency.clone(),
        }
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dirs) = directories::ProjectDirs::from("com", "remito", "register") {
            paths.push(dirs.config_dir().join(CONFIG_FILE_NAME));
        }
        paths
    }
}

// =============================================================================
// State
// =============================================================================

/// Configuration plus the renderer built from it.
#[derive(Debug, Clone)]
pub struct ConfigState {
    config: RegisterConfig,
    renderer: ReceiptRenderer,
}

impl ConfigState {
    pub fn new(config: RegisterConfig) -> Self {
        let renderer = ReceiptRenderer::new(config.render_settings());
        ConfigState { config, renderer }
    }

    pub fn config(&self) -> &RegisterConfig {
        &self.config
    }

    pub fn renderer(&self) -> &ReceiptRenderer {
        &self.renderer
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.config.currency
    }

    /// Decimal separator operators type prices with.
    pub fn decimal_separator(&self) -> char {
        self.config.currency.decimal_separator
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState::new(RegisterConfig::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RegisterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.database_path, PathBuf::from("remitos.db"));
        assert_eq!(config.document.business_name, "Ferreteria San Miguel");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RegisterConfig = toml::from_str(
            r#"
            [document]
            business_name = "Corralon Norte"

            [currency]
            thousands_separator = "."
            decimal_separator = ","
            "#,
        )
        .unwrap();

        assert_eq!(config.document.business_name, "Corralon Norte");
        assert_eq!(config.document.footer_message, "Thank you for your purchase!");
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.currency.decimal_separator, ',');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = RegisterConfig::default();
        config.document.business_name = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RegisterConfig::default();
        config.currency.symbol.clear();
        assert!(config.validate().is_err());

        let mut config = RegisterConfig::default();
        config.currency.thousands_separator = '.';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = RegisterConfig::default();
        config.document.output_dir = PathBuf::from("out");
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = RegisterConfig::load(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RegisterConfig::load(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[store\ndatabase_path = 3").unwrap();

        assert!(matches!(
            RegisterConfig::load(Some(path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_config_state_builds_renderer() {
        let mut config = RegisterConfig::default();
        config.document.output_dir = PathBuf::from("/tmp/remitos");
        let state = ConfigState::new(config);

        assert_eq!(
            state.renderer().settings().output_dir,
            PathBuf::from("/tmp/remitos")
        );
        assert_eq!(state.decimal_separator(), '.');
    }
}
