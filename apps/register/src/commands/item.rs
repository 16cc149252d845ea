//! # Item Commands
//!
//! Line item entry for the receipt in progress.

use serde::Serialize;
use tracing::debug;

use remito_core::ledger::LedgerLine;
use remito_core::{CurrencyFormat, LineId, Session};

use crate::error::ApiError;
use crate::state::{ConfigState, ReceiptState};

/// One line as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub id: LineId,
    pub quantity: i64,
    pub product: String,
    pub unit_price: String,
    pub subtotal: String,
}

impl LineView {
    fn new(line: &LedgerLine, currency: &CurrencyFormat) -> Self {
        LineView {
            id: line.id,
            quantity: line.item.quantity(),
            product: line.item.product().to_string(),
            unit_price: currency.format(line.item.unit_price()),
            subtotal: currency.format(line.item.subtotal()),
        }
    }
}

/// Current receipt: number, state, lines, and total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptView {
    pub number: String,
    pub state: String,
    pub lines: Vec<LineView>,
    pub total_cents: i64,
    pub total: String,
}

impl ReceiptView {
    pub fn from_session(session: &Session, currency: &CurrencyFormat) -> Self {
        let total = session.total();
        ReceiptView {
            number: session.number().to_string(),
            state: session.state().to_string(),
            lines: session
                .lines()
                .iter()
                .map(|line| LineView::new(line, currency))
                .collect(),
            total_cents: total.cents(),
            total: currency.format(total),
        }
    }
}

/// Adds a line item from raw operator text.
///
/// Invalid input leaves the receipt unchanged and returns `INVALID_ITEM`.
pub async fn add_item(
    receipt: &ReceiptState,
    config: &ConfigState,
    quantity: &str,
    product: &str,
    unit_price: &str,
) -> Result<ReceiptView, ApiError> {
    let mut guard = receipt.lock().await;
    let session = guard.as_mut().ok_or_else(ApiError::no_session)?;

    let number = session.number();
    let line = session.add_item(quantity, product, unit_price, config.decimal_separator())?;
    debug!(
        number = %number,
        line = %line.id,
        product = %line.item.product(),
        subtotal = line.item.subtotal().cents(),
        "Item added"
    );

    Ok(ReceiptView::from_session(session, config.currency()))
}

/// Removes the selected lines. Unknown ids are ignored.
pub async fn remove_selected(
    receipt: &ReceiptState,
    config: &ConfigState,
    selection: &[LineId],
) -> Result<ReceiptView, ApiError> {
    let mut guard = receipt.lock().await;
    let session = guard.as_mut().ok_or_else(ApiError::no_session)?;

    let removed = session.remove_items(selection)?;
    debug!(
        number = %session.number(),
        requested = selection.len(),
        removed = removed.len(),
        "Items removed"
    );

    Ok(ReceiptView::from_session(session, config.currency()))
}

/// The receipt in progress.
pub async fn current_receipt(
    receipt: &ReceiptState,
    config: &ConfigState,
) -> Result<ReceiptView, ApiError> {
    receipt
        .with_session(|session| {
            session
                .map(|s| ReceiptView::from_session(s, config.currency()))
                .ok_or_else(ApiError::no_session)
        })
        .await
}

// =============================================================================
// Unit Tests
// =============================================================================
