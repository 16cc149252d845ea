//! # Receipt Renderer
//!
//! Writes `remito_NNNN.pdf` for a finalized receipt.
//!
//! ## Output Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  render(&FinalizedReceipt)                                              │
//! │       │                                                                 │
//! │       ├── create output_dir (if missing)                               │
//! │       ├── layout::build()            pure                              │
//! │       ├── pdf::paint()               bytes in memory                   │
//! │       ├── write  .remito_0001.pdf.tmp                                  │
//! │       └── rename → remito_0001.pdf   replaces an earlier render        │
//! │                                                                         │
//! │  A failure at any step leaves no partial remito_0001.pdf behind.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use remito_core::{CurrencyFormat, FinalizedReceipt, ReceiptNumber};

use crate::error::{RenderError, RenderResult};
use crate::layout::{self, DocumentLayout};
use crate::pdf;

/// What goes on the document besides the receipt itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Directory the documents are written to.
    pub output_dir: PathBuf,

    /// Printed at the top of every receipt.
    pub business_name: String,

    /// Printed centered below the total.
    pub footer_message: String,

    pub currency: CurrencyFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            output_dir: PathBuf::from("."),
            business_name: "Ferreteria San Miguel".to_string(),
            footer_message: "Thank you for your purchase!".to_string(),
            currency: CurrencyFormat::default(),
        }
    }
}

/// A document written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: usize,
}

/// Renders finalized receipts to PDF files.
///
/// Never reads the store: the document shows exactly the receipt it is given.
#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    settings: RenderSettings,
}

impl ReceiptRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        ReceiptRenderer { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// File name for a receipt number, e.g. `remito_0001.pdf`.
    pub fn file_name(number: ReceiptNumber) -> String {
        format!("remito_{}.pdf", number)
    }

    /// Where the document for `number` is written.
    pub fn document_path(&self, number: ReceiptNumber) -> PathBuf {
        self.settings.output_dir.join(Self::file_name(number))
    }

    /// Lays out the document without writing anything.
    pub fn layout(&self, receipt: &FinalizedReceipt) -> DocumentLayout {
        layout::build(receipt, &self.settings)
    }

    /// Renders the receipt to its PDF file, replacing any earlier render of
    /// the same number.
    pub fn render(&self, receipt: &FinalizedReceipt) -> RenderResult<RenderedDocument> {
        let output_dir = &self.settings.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| RenderError::io(output_dir, e))?;

        let layout = self.layout(receipt);
        debug!(
            number = %receipt.number,
            pages = layout.pages.len(),
            "Receipt laid out"
        );

        let title = format!("{} - Receipt No. {}", self.settings.business_name, receipt.number);
        let bytes = pdf::paint(&layout, &title)?;

        let path = self.document_path(receipt.number);
        write_atomically(&path, &bytes)?;

        info!(
            number = %receipt.number,
            path = %path.display(),
            bytes = bytes.len(),
            "Receipt document written"
        );

        Ok(RenderedDocument {
            path,
            pages: layout.pages.len(),
            bytes: bytes.len(),
        })
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> RenderResult<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{}.tmp", file_name));

    let result = fs::write(&temp, bytes)
        .map_err(|e| RenderError::io(&temp, e))
        .and_then(|()| fs::rename(&temp, path).map_err(|e| RenderError::io(path, e)));

    if result.is_err() {
        if let Err(e) = fs::remove_file(&temp) {
            warn!(path = %temp.display(), error = %e, "Could not remove temporary document");
        }
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use remito_core::{LineItem, Money};

    fn hammer_receipt() -> FinalizedReceipt {
        let items = vec![
            LineItem::new(2, "Hammer", Money::from_major(500)).unwrap(),
            LineItem::new(1, "Nail box", Money::from_major(150)).unwrap(),
        ];
        FinalizedReceipt {
            number: ReceiptNumber::new(1),
            issued_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            total: items.iter().map(LineItem::subtotal).sum(),
            items,
        }
    }

    fn renderer_in(dir: &Path) -> ReceiptRenderer {
        ReceiptRenderer::new(RenderSettings {
            output_dir: dir.to_path_buf(),
            ..RenderSettings::default()
        })
    }

    #[test]
    fn test_file_name_from_number() {
        assert_eq!(ReceiptRenderer::file_name(ReceiptNumber::new(1)), "remito_0001.pdf");
        assert_eq!(
            ReceiptRenderer::file_name(ReceiptNumber::new(12345)),
            "remito_12345.pdf"
        );
    }

    #[test]
    fn test_render_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());

        let document = renderer.render(&hammer_receipt()).unwrap();

        assert_eq!(document.path, dir.path().join("remito_0001.pdf"));
        assert_eq!(document.pages, 1);
        let bytes = fs::read(&document.path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(bytes.len(), document.bytes);
    }

    #[test]
    fn test_render_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(&dir.path().join("out").join("remitos"));

        let document = renderer.render(&hammer_receipt()).unwrap();
        assert!(document.path.exists());
    }

    #[test]
    fn test_rerender_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_in(dir.path());

        renderer.render(&hammer_receipt()).unwrap();
        renderer.render(&hammer_receipt()).unwrap();

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_unwritable_output_dir_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();
        let renderer = renderer_in(&blocker);

        let err = renderer.render(&hammer_receipt()).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
