//! # Receipt Session
//!
//! One receipt being built, from number allocation to finalize.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │   Session::new(number) ──► OPEN ◄──┐ add_item / remove_items           │
//! │                             │ ─────┘                                    │
//! │                             │                                           │
//! │                  prepare_finalize()                                     │
//! │                             │  (no items → EmptyReceipt)                │
//! │                             ▼                                           │
//! │                  FinalizeStep::Persist ── store.save ──► mark_saved()   │
//! │                                                            │            │
//! │                                                            ▼            │
//! │                                                     RENDER PENDING      │
//! │                                                            │            │
//! │                  renderer.render ──► mark_rendered() ──────┤            │
//! │                                                            ▼            │
//! │                                                       FINALIZED         │
//! │                                                                         │
//! │   Abandon: the caller drops the session and opens a new one.           │
//! │   The unsaved number is simply never persisted.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session in RENDER PENDING answers `prepare_finalize` with
//! `FinalizeStep::RenderOnly`, so a failed render can be retried without
//! saving the receipt a second time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::ledger::{Ledger, LedgerLine};
use crate::money::Money;
use crate::types::{FinalizedReceipt, LineId, LineItem, ReceiptNumber};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum SessionState {
    /// Items can be added and removed.
    Open,

    /// The receipt is durably saved; its document has not been written yet.
    RenderPending { receipt: FinalizedReceipt },

    /// Saved and rendered. Terminal.
    Finalized {
        receipt: FinalizedReceipt,
        document: PathBuf,
    },
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Open => write!(f, "open"),
            SessionState::RenderPending { .. } => write!(f, "saved, render pending"),
            SessionState::Finalized { .. } => write!(f, "finalized"),
        }
    }
}

/// What the caller must do to finish a finalize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeStep {
    /// Save this receipt, then render it.
    Persist(FinalizedReceipt),

    /// Already saved: render only.
    RenderOnly(FinalizedReceipt),
}

/// A receipt session.
#[derive(Debug, Clone)]
pub struct Session {
    number: ReceiptNumber,
    opened_at: DateTime<Utc>,
    ledger: Ledger,
    state: SessionState,
}

impl Session {
    /// Opens a session for a number allocated by the sequencer.
    pub fn new(number: ReceiptNumber, opened_at: DateTime<Utc>) -> Self {
        Session {
            number,
            opened_at,
            ledger: Ledger::new(),
            state: SessionState::Open,
        }
    }

    #[inline]
    pub fn number(&self) -> ReceiptNumber {
        self.number
    }

    #[inline]
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open)
    }

    /// Lines currently on the receipt being built. Empty once saved.
    pub fn lines(&self) -> &[LedgerLine] {
        self.ledger.lines()
    }

    /// Running total while open; the saved total afterwards.
    pub fn total(&self) -> Money {
        match &self.state {
            SessionState::Open => self.ledger.total(),
            SessionState::RenderPending { receipt } | SessionState::Finalized { receipt, .. } => {
                receipt.total
            }
        }
    }

    /// The saved receipt, once persisted.
    pub fn receipt(&self) -> Option<&FinalizedReceipt> {
        match &self.state {
            SessionState::Open => None,
            SessionState::RenderPending { receipt } | SessionState::Finalized { receipt, .. } => {
                Some(receipt)
            }
        }
    }

    /// Path of the rendered document, once finalized.
    pub fn document(&self) -> Option<&Path> {
        match &self.state {
            SessionState::Finalized { document, .. } => Some(document),
            _ => None,
        }
    }

    /// Adds a line from raw operator input.
    pub fn add_item(
        &mut self,
        quantity: &str,
        product: &str,
        unit_price: &str,
        decimal_separator: char,
    ) -> CoreResult<&LedgerLine> {
        self.ensure_open()?;
        self.ledger
            .add_parsed_with(quantity, product, unit_price, decimal_separator)
    }

    /// Removes the selected lines.
    pub fn remove_items(&mut self, selection: &[LineId]) -> CoreResult<Vec<LineItem>> {
        self.ensure_open()?;
        Ok(self.ledger.remove(selection))
    }

    /// Freezes the receipt for finalize.
    ///
    /// ## Errors
    /// - `EmptyReceipt` when open with no lines
    /// - `SessionClosed` when already finalized
    pub fn prepare_finalize(&self, issued_on: NaiveDate) -> CoreResult<FinalizeStep> {
        match &self.state {
            SessionState::Open => {
                if self.ledger.is_empty() {
                    return Err(CoreError::EmptyReceipt);
                }

                Ok(FinalizeStep::Persist(FinalizedReceipt {
                    number: self.number,
                    issued_on,
                    items: self.ledger.items().cloned().collect(),
                    total: self.ledger.total(),
                }))
            }
            SessionState::RenderPending { receipt } => Ok(FinalizeStep::RenderOnly(receipt.clone())),
            SessionState::Finalized { .. } => Err(self.closed()),
        }
    }

    /// Records that the receipt was durably saved.
    ///
    /// The ledger is emptied; the receipt now owns the items.
    pub fn mark_saved(&mut self, receipt: FinalizedReceipt) -> CoreResult<()> {
        self.ensure_open()?;
        self.ledger.reset();
        self.state = SessionState::RenderPending { receipt };
        Ok(())
    }

    /// Records that the document was written.
    pub fn mark_rendered(&mut self, document: PathBuf) -> CoreResult<()> {
        let state = std::mem::replace(&mut self.state, SessionState::Open);
        match state {
            SessionState::RenderPending { receipt } => {
                self.state = SessionState::Finalized { receipt, document };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.closed())
            }
        }
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(self.closed())
        }
    }

    fn closed(&self) -> CoreError {
        CoreError::SessionClosed {
            number: self.number.to_string(),
            state: self.state.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn open_session() -> Session {
        Session::new(ReceiptNumber::first(), Utc::now())
    }

    fn filled_session() -> Session {
        let mut session = open_session();
        session.add_item("2", "Hammer", "500", '.').unwrap();
        session.add_item("1", "Nail box", "150", '.').unwrap();
        session
    }

    #[test]
    fn test_empty_session_cannot_finalize() {
        let session = open_session();
        assert_eq!(
            session.prepare_finalize(issue_date()),
            Err(CoreError::EmptyReceipt)
        );
        assert!(session.is_open());
    }

    #[test]
    fn test_prepare_finalize_snapshots_ledger() {
        let session = filled_session();

        let step = session.prepare_finalize(issue_date()).unwrap();
        let FinalizeStep::Persist(receipt) = step else {
            panic!("expected a persist step");
        };

        assert_eq!(receipt.number.to_string(), "0001");
        assert_eq!(receipt.issued_on, issue_date());
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.total, Money::from_major(1150));
        assert_eq!(receipt.total, receipt.recomputed_total());
        // preparing does not change state
        assert!(session.is_open());
        assert_eq!(session.lines().len(), 2);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut session = filled_session();
        let FinalizeStep::Persist(receipt) = session.prepare_finalize(issue_date()).unwrap() else {
            panic!("expected a persist step");
        };

        session.mark_saved(receipt.clone()).unwrap();
        assert!(session.lines().is_empty());
        assert_eq!(session.total(), Money::from_major(1150));
        assert_eq!(session.receipt(), Some(&receipt));
        assert!(session.document().is_none());

        session.mark_rendered(PathBuf::from("remito_0001.pdf")).unwrap();
        assert_eq!(session.document(), Some(Path::new("remito_0001.pdf")));
        assert!(matches!(session.state(), SessionState::Finalized { .. }));
    }

    #[test]
    fn test_render_pending_retries_render_only() {
        let mut session = filled_session();
        let FinalizeStep::Persist(receipt) = session.prepare_finalize(issue_date()).unwrap() else {
            panic!("expected a persist step");
        };
        session.mark_saved(receipt.clone()).unwrap();

        let later = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(
            session.prepare_finalize(later).unwrap(),
            FinalizeStep::RenderOnly(receipt)
        );
    }

    #[test]
    fn test_closed_session_rejects_edits() {
        let mut session = filled_session();
        let FinalizeStep::Persist(receipt) = session.prepare_finalize(issue_date()).unwrap() else {
            panic!("expected a persist step");
        };
        session.mark_saved(receipt).unwrap();

        assert!(matches!(
            session.add_item("1", "Saw", "10", '.'),
            Err(CoreError::SessionClosed { .. })
        ));
        assert!(matches!(
            session.remove_items(&[LineId(0)]),
            Err(CoreError::SessionClosed { .. })
        ));

        session.mark_rendered(PathBuf::from("x.pdf")).unwrap();
        assert!(matches!(
            session.prepare_finalize(issue_date()),
            Err(CoreError::SessionClosed { .. })
        ));
    }

    #[test]
    fn test_mark_rendered_requires_saved_receipt() {
        let mut session = filled_session();
        assert!(session.mark_rendered(PathBuf::from("x.pdf")).is_err());
        assert!(session.is_open());
        assert_eq!(session.lines().len(), 2);
    }

    #[test]
    fn test_state_serializes_with_tag() {
        assert_eq!(
            serde_json::to_value(SessionState::Open).unwrap(),
            serde_json::json!({ "state": "open" })
        );
    }

    #[test]
    fn test_invalid_item_keeps_session_open() {
        let mut session = filled_session();
        assert!(matches!(
            session.add_item("1", "Saw", "ten", '.'),
            Err(CoreError::InvalidItem(_))
        ));
        assert_eq!(session.lines().len(), 2);
        assert_eq!(session.total(), Money::from_major(1150));
    }
}
