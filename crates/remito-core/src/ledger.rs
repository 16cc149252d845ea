//! # Ledger
//!
//! The in-memory list of line items for the receipt being built.
//!
//! ## Ledger Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Operator Action          Ledger Call              State Change         │
//! │  ───────────────          ───────────              ────────────         │
//! │                                                                         │
//! │  Submit entry ───────────► add_parsed() ─────────► lines.push(line)    │
//! │                                                    total += subtotal    │
//! │                                                                         │
//! │  Remove selection ───────► remove(&[ids]) ───────► lines.retain(..)    │
//! │                                                    total -= subtotals   │
//! │                                                                         │
//! │  New receipt ────────────► reset() ──────────────► lines.clear()       │
//! │                                                    total = 0            │
//! │                                                                         │
//! │  INVARIANT: total == Σ line.subtotal after every call                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed add leaves the ledger exactly as it was.

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{LineId, LineItem};
use crate::validation::{parse_price, parse_quantity};

/// A line item together with its handle in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub id: LineId,
    pub item: LineItem,
}

/// Ordered line items plus their running total.
///
/// ## Invariants
/// - Lines keep insertion order
/// - `total()` equals the sum of the current subtotals
/// - Line ids increase monotonically and are never reused
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    lines: Vec<LedgerLine>,
    total: Money,
    next_id: u64,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Parses the three operator fields and appends the resulting line.
    ///
    /// Uses `.` as the decimal separator; see [`Ledger::add_parsed_with`].
    pub fn add_parsed(
        &mut self,
        quantity: &str,
        product: &str,
        unit_price: &str,
    ) -> CoreResult<&LedgerLine> {
        self.add_parsed_with(quantity, product, unit_price, '.')
    }

    /// Parses the three operator fields and appends the resulting line.
    ///
    /// ## Errors
    /// `CoreError::InvalidItem` if any field is rejected. Nothing is mutated
    /// in that case.
    pub fn add_parsed_with(
        &mut self,
        quantity: &str,
        product: &str,
        unit_price: &str,
        decimal_separator: char,
    ) -> CoreResult<&LedgerLine> {
        let quantity = parse_quantity(quantity)?;
        let unit_price = parse_price(unit_price, decimal_separator)?;
        let item = LineItem::new(quantity, product, unit_price)?;

        self.add(item)
    }

    /// Appends an already validated line item.
    pub fn add(&mut self, item: LineItem) -> CoreResult<&LedgerLine> {
        let total = self
            .total
            .checked_add(item.subtotal())
            .ok_or_else(|| ValidationError::Overflow {
                field: "total".to_string(),
            })?;

        let id = LineId(self.next_id);
        self.next_id += 1;

        self.total = total;
        self.lines.push(LedgerLine { id, item });
        self.check_total();

        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Removes every selected line and returns the removed items in ledger
    /// order.
    ///
    /// Unknown ids are ignored; an empty selection is a no-op. The total is
    /// reduced by each removed subtotal.
    pub fn remove(&mut self, selection: &[LineId]) -> Vec<LineItem> {
        if selection.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.lines.len());

        for line in self.lines.drain(..) {
            if selection.contains(&line.id) {
                removed.push(line.item);
            } else {
                kept.push(line);
            }
        }
        self.lines = kept;

        for item in &removed {
            self.total -= item.subtotal();
        }

        self.check_total();

        removed
    }

    /// Clears all lines and the total.
    ///
    /// Line ids keep counting up so handles from before the reset stay dead.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.total = Money::zero();
    }

    /// Current sum of the line subtotals.
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Resums every subtotal from scratch.
    pub fn recomputed_total(&self) -> Money {
        self.items().map(LineItem::subtotal).sum()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[LedgerLine] {
        &self.lines
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().map(|line| &line.item)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn check_total(&self) {
        debug_assert_eq!(
            self.total,
            self.recomputed_total(),
            "running total drifted from line subtotals"
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_parsed("2", "Hammer", "500").unwrap();
        ledger.add_parsed("1", "Nail box", "150").unwrap();
        ledger
    }

    #[test]
    fn test_add_computes_total() {
        let ledger = sample_ledger();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total(), Money::from_major(1150));
        assert_eq!(ledger.total(), ledger.recomputed_total());
    }

    #[test]
    fn test_add_keeps_order_and_assigns_ids() {
        let ledger = sample_ledger();
        let lines = ledger.lines();

        assert_eq!(lines[0].item.product(), "Hammer");
        assert_eq!(lines[1].item.product(), "Nail box");
        assert!(lines[0].id < lines[1].id);
    }

    #[test]
    fn test_invalid_price_leaves_ledger_unchanged() {
        let mut ledger = sample_ledger();

        let err = ledger.add_parsed("1", "Saw", "cheap").unwrap_err();

        assert!(matches!(err, CoreError::InvalidItem(_)));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total(), Money::from_major(1150));
    }

    #[test]
    fn test_invalid_quantity_and_product_rejected() {
        let mut ledger = Ledger::new();

        assert!(ledger.add_parsed("x", "Saw", "10").is_err());
        assert!(ledger.add_parsed("0", "Saw", "10").is_err());
        assert!(ledger.add_parsed("1", "", "10").is_err());
        assert!(ledger.is_empty());
        assert!(ledger.total().is_zero());
    }

    #[test]
    fn test_remove_subtracts_subtotals() {
        let mut ledger = sample_ledger();
        let hammer = ledger.lines()[0].id;

        let removed = ledger.remove(&[hammer]);

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].product(), "Hammer");
        assert_eq!(ledger.total(), Money::from_major(150));
        assert_eq!(ledger.total(), ledger.recomputed_total());
    }

    #[test]
    fn test_remove_multiple_and_unknown_ids() {
        let mut ledger = sample_ledger();
        ledger.add_parsed("3", "Screwdriver", "80.50").unwrap();
        let ids: Vec<LineId> = ledger.lines().iter().map(|l| l.id).collect();

        let removed = ledger.remove(&[ids[2], LineId(999), ids[0]]);

        assert_eq!(removed.len(), 2);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.lines()[0].item.product(), "Nail box");
        assert_eq!(ledger.total(), Money::from_major(150));
    }

    #[test]
    fn test_remove_empty_selection_is_noop() {
        let mut ledger = sample_ledger();

        assert!(ledger.remove(&[]).is_empty());
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total(), Money::from_major(1150));
    }

    #[test]
    fn test_remove_same_id_twice() {
        let mut ledger = sample_ledger();
        let hammer = ledger.lines()[0].id;

        ledger.remove(&[hammer]);
        assert!(ledger.remove(&[hammer]).is_empty());
        assert_eq!(ledger.total(), Money::from_major(150));
    }

    #[test]
    fn test_reset_clears_but_never_reuses_ids() {
        let mut ledger = sample_ledger();
        let old_ids: Vec<LineId> = ledger.lines().iter().map(|l| l.id).collect();

        ledger.reset();
        assert!(ledger.is_empty());
        assert!(ledger.total().is_zero());

        let new_id = ledger.add_parsed("1", "Glue", "20").unwrap().id;
        assert!(!old_ids.contains(&new_id));
    }

    #[test]
    fn test_total_matches_resum_over_mixed_operations() {
        let mut ledger = Ledger::new();
        let entries = [
            ("1", "A", "10"),
            ("4", "B", "0.99"),
            ("7", "C", "1234.56"),
            ("2", "D", "0"),
            ("9", "E", "15.5"),
            ("3", "F", "999"),
        ];

        for (step, (qty, product, price)) in entries.iter().enumerate() {
            ledger.add_parsed(qty, product, price).unwrap();
            assert_eq!(ledger.total(), ledger.recomputed_total());

            if step % 2 == 1 {
                let first = ledger.lines()[0].id;
                ledger.remove(&[first]);
                assert_eq!(ledger.total(), ledger.recomputed_total());
            }
        }

        assert_eq!(ledger.len(), 3);
    }
}
