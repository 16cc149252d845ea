//! # Render Error Types
//!
//! A render error always happens AFTER the receipt was saved. The register
//! reports it apart from persistence failures and retries rendering only.

use std::path::PathBuf;
use thiserror::Error;

/// Document generation errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output directory or file could not be written.
    ///
    /// ## When This Occurs
    /// - `output_dir` is a regular file or not writable
    /// - Disk full
    #[error("Cannot write document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF library rejected the document.
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
