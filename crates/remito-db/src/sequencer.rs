//! # Sequencer
//!
//! Derives the next receipt number from persisted history.
//!
//! There is no counter in memory: every call re-reads the store. A session
//! that is abandoned before saving consumes nothing, so its number is offered
//! again to the next session.

use tracing::{debug, warn};

use crate::error::{SequenceError, SequenceResult};
use crate::repository::receipt::ReceiptRepository;
use remito_core::ReceiptNumber;

/// Store-backed receipt number allocator. Read-only.
#[derive(Debug, Clone)]
pub struct Sequencer {
    receipts: ReceiptRepository,
}

impl Sequencer {
    pub fn new(receipts: ReceiptRepository) -> Self {
        Sequencer { receipts }
    }

    /// Returns the number the next receipt should carry.
    ///
    /// ## Errors
    /// - `SequenceError::Store` if history cannot be read
    /// - `SequenceError::Malformed` if the last stored number does not parse;
    ///   allocation halts rather than restarting at `0001`
    pub async fn next_number(&self) -> SequenceResult<ReceiptNumber> {
        let last = self.receipts.latest_number().await?;

        let next = ReceiptNumber::following(last.as_deref()).map_err(|e| {
            warn!(stored = ?last, "Stored receipt number is malformed");
            SequenceError::from(e)
        })?;

        debug!(last = ?last, next = %next, "Allocated receipt number");
        Ok(next)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
