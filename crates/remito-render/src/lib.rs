//! # remito-render: Receipt Documents
//!
//! Produces the printable A4 PDF for a finalized receipt.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  finalize_session ── FinalizedReceipt ──┬──► remito-db   (save first)  │
//! │                                         │                               │
//! │                                         └──► remito-render (THIS CRATE) │
//! │                                               │                         │
//! │                     ┌─────────────────────────┼──────────────────────┐  │
//! │                     │  layout   (pure)  ──►  pdf (printpdf)  ──► file │  │
//! │                     └────────────────────────────────────────────────┘  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`layout`] - Page geometry and the layout model
//! - [`metrics`] - Helvetica glyph widths
//! - [`renderer`] - `ReceiptRenderer` and file output
//! - [`error`] - `RenderError`

pub mod error;
pub mod layout;
pub mod metrics;
mod pdf;
pub mod renderer;

pub use error::{RenderError, RenderResult};
pub use layout::DocumentLayout;
pub use renderer::{ReceiptRenderer, RenderSettings, RenderedDocument};
