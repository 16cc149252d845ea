//! # Receipt Repository
//!
//! Durable storage of finalized receipts and their line items.
//!
//! ## Save Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       save(&FinalizedReceipt)                           │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    INSERT INTO receipts ...            → receipt_id (last_insert_rowid)│
//! │    INSERT INTO receipt_items ... × N   (receipt_id, position 0..N)     │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any failure before COMMIT drops the transaction, which rolls back.    │
//! │  latest() never sees a receipt without all of its items.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are append-only: nothing here updates or deletes.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use remito_core::{FinalizedReceipt, LineItem, Money, ReceiptNumber};

// =============================================================================
// Persisted Form
// =============================================================================

/// A receipt as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReceipt {
    /// Internal auto-increment id. Orders receipts by insertion.
    pub id: i64,

    /// When the row was written.
    pub created_at: DateTime<Utc>,

    /// The receipt exactly as it was saved.
    pub receipt: FinalizedReceipt,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ReceiptRecord {
    id: i64,
    number: String,
    issued_on: NaiveDate,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ReceiptItemRecord {
    quantity: i64,
    product: String,
    unit_price_cents: i64,
    subtotal_cents: i64,
}

impl From<ReceiptItemRecord> for LineItem {
    fn from(record: ReceiptItemRecord) -> Self {
        LineItem::from_parts(
            record.quantity,
            record.product,
            Money::from_cents(record.unit_price_cents),
            Money::from_cents(record.subtotal_cents),
        )
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for receipt database operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Saves a receipt and all of its items in one transaction.
    ///
    /// ## Returns
    /// The internal id of the new receipt row.
    ///
    /// ## Errors
    /// - `UniqueViolation` if the number is already persisted
    /// - anything the store reports; in every error case nothing was written
    pub async fn save(&self, receipt: &FinalizedReceipt) -> DbResult<i64> {
        if receipt.items.is_empty() {
            return Err(DbError::Internal(format!(
                "refusing to save receipt {} without items",
                receipt.number
            )));
        }

        let number = receipt.number.to_string();
        debug!(number = %number, items = receipt.items.len(), "Saving receipt");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let receipt_id = sqlx::query(
            r#"
            INSERT INTO receipts (number, issued_on, total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&number)
        .bind(receipt.issued_on)
        .bind(receipt.total.cents())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_value(number.as_str()))?
        .last_insert_rowid();

        for (position, item) in receipt.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO receipt_items (
                    receipt_id, position, quantity, product,
                    unit_price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(receipt_id)
            .bind(position as i64)
            .bind(item.quantity())
            .bind(item.product())
            .bind(item.unit_price().cents())
            .bind(item.subtotal().cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            number = %number,
            receipt_id,
            total_cents = receipt.total.cents(),
            "Receipt saved"
        );

        Ok(receipt_id)
    }

    /// Returns the most recently inserted receipt, or `None` when the store is
    /// empty.
    pub async fn latest(&self) -> DbResult<Option<PersistedReceipt>> {
        let record = sqlx::query_as::<_, ReceiptRecord>(
            r#"
            SELECT id, number, issued_on, total_cents, created_at
            FROM receipts
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) => Ok(Some(self.load(record).await?)),
            None => Ok(None),
        }
    }

    /// Returns the raw number of the most recently inserted receipt.
    ///
    /// Not parsed: deciding what a malformed number means is the
    /// sequencer's job.
    pub async fn latest_number(&self) -> DbResult<Option<String>> {
        let number: Option<String> =
            sqlx::query_scalar("SELECT number FROM receipts ORDER BY id DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(number)
    }

    /// Fetches a persisted receipt by its number.
    pub async fn get_by_number(&self, number: ReceiptNumber) -> DbResult<Option<PersistedReceipt>> {
        let record = sqlx::query_as::<_, ReceiptRecord>(
            r#"
            SELECT id, number, issued_on, total_cents, created_at
            FROM receipts
            WHERE number = ?1
            "#,
        )
        .bind(number.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) => Ok(Some(self.load(record).await?)),
            None => Ok(None),
        }
    }

    /// Number of persisted receipts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn load(&self, record: ReceiptRecord) -> DbResult<PersistedReceipt> {
        let number = ReceiptNumber::parse(&record.number)
            .map_err(|e| DbError::corrupt("receipt", e.to_string()))?;

        let items: Vec<LineItem> = sqlx::query_as::<_, ReceiptItemRecord>(
            r#"
            SELECT quantity, product, unit_price_cents, subtotal_cents
            FROM receipt_items
            WHERE receipt_id = ?1
            ORDER BY position
            "#,
        )
        .bind(record.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(LineItem::from)
        .collect();

        debug!(number = %number, items = items.len(), "Receipt loaded");

        Ok(PersistedReceipt {
            id: record.id,
            created_at: record.created_at,
            receipt: FinalizedReceipt {
                number,
                issued_on: record.issued_on,
                items,
                total: Money::from_cents(record.total_cents),
            },
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
