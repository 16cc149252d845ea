//! # Receipt Commands
//!
//! Starting and finalizing receipt sessions.
//!
//! ## Finalize Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    finalize_session()                                   │
//! │                                                                         │
//! │  1. LOCK SESSION                                                        │
//! │     └── no session → INVALID_STATE                                      │
//! │                                                                         │
//! │  2. PREPARE                                                             │
//! │     ├── Open, no items   → EMPTY_RECEIPT (nothing written)              │
//! │     ├── Open             → Persist(snapshot)                            │
//! │     ├── RenderPending    → RenderOnly(saved snapshot)                   │
//! │     └── Finalized        → INVALID_STATE                                │
//! │                                                                         │
//! │  3. SAVE (Persist only)                                                 │
//! │     ├── error → PERSISTENCE_ERROR, session stays Open, no document      │
//! │     └── ok    → session RenderPending                                   │
//! │                                                                         │
//! │  4. RENDER                                                              │
//! │     ├── error → RENDER_ERROR, session stays RenderPending               │
//! │     └── ok    → session Finalized                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use remito_core::{FinalizeStep, Session, SessionState};

use crate::commands::item::ReceiptView;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, ReceiptState};

/// Result of a successful finalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub number: String,
    pub issued_on: NaiveDate,
    pub item_count: usize,
    pub total_cents: i64,
    pub total: String,

    /// Rendered document, for opening in an external viewer.
    pub document: PathBuf,
    pub pages: usize,

    /// True when this call only re-rendered an already saved receipt.
    pub render_retry: bool,
}

/// Starts a new receipt session, discarding the current one.
///
/// The number comes from the store: one past the last persisted receipt.
/// A discarded session that was never saved leaves its number unused, so it
/// is offered again here.
pub async fn start_new_session(
    db: &DbState,
    receipt: &ReceiptState,
    config: &ConfigState,
) -> Result<ReceiptView, ApiError> {
    let mut guard = receipt.lock().await;

    let number = db.inner().sequencer().next_number().await?;

    if let Some(previous) = guard.as_ref() {
        match previous.state() {
            SessionState::Open if !previous.lines().is_empty() => {
                info!(
                    number = %previous.number(),
                    items = previous.lines().len(),
                    "Receipt abandoned"
                );
            }
            SessionState::RenderPending { .. } => {
                warn!(
                    number = %previous.number(),
                    "Abandoning saved receipt whose document was never written"
                );
            }
            _ => {}
        }
    }

    let session = Session::new(number, Utc::now());
    info!(number = %number, "Receipt session started");

    let view = ReceiptView::from_session(&session, config.currency());
    *guard = Some(session);
    Ok(view)
}

/// Finalizes the receipt in progress: save, then render.
///
/// A save failure means no document is produced. A render failure keeps the
/// saved receipt pending; calling again renders it without saving twice.
pub async fn finalize_session(
    db: &DbState,
    receipt: &ReceiptState,
    config: &ConfigState,
    issued_on: NaiveDate,
) -> Result<FinalizeResponse, ApiError> {
    let mut guard = receipt.lock().await;
    let session = guard.as_mut().ok_or_else(ApiError::no_session)?;

    let (finalized, render_retry) = match session.prepare_finalize(issued_on)? {
        FinalizeStep::Persist(finalized) => {
            let id = db.inner().receipts().save(&finalized).await?;
            debug!(number = %finalized.number, id, "Rendering saved receipt");
            session.mark_saved(finalized.clone())?;
            (finalized, false)
        }
        FinalizeStep::RenderOnly(finalized) => {
            info!(number = %finalized.number, "Retrying receipt document");
            (finalized, true)
        }
    };

    let document = config
        .renderer()
        .render(&finalized)
        .map_err(|e| ApiError::render(finalized.number, e))?;

    session.mark_rendered(document.path.clone())?;
    info!(
        number = %finalized.number,
        path = %document.path.display(),
        "Receipt finalized"
    );

    Ok(FinalizeResponse {
        number: finalized.number.to_string(),
        issued_on: finalized.issued_on,
        item_count: finalized.items.len(),
        total_cents: finalized.total.cents(),
        total: config.currency().format(finalized.total),
        document: document.path,
        pages: document.pages,
        render_retry,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::item::add_item;
    use crate::error::ErrorCode;
    use crate::state::RegisterConfig;
    use remito_core::ReceiptNumber;
    use remito_db::{Database, DbConfig};
    use std::path::Path;

    struct Fixture {
        db: DbState,
        receipt: ReceiptState,
        config: ConfigState,
        _dir: tempfile::TempDir,
    }

    fn config_for(output_dir: &Path) -> ConfigState {
        let mut config = RegisterConfig::default();
        config.document.output_dir = output_dir.to_path_buf();
        ConfigState::new(config)
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Fixture {
            db: DbState::new(db),
            receipt: ReceiptState::new(),
            config: config_for(&dir.path().join("remitos")),
            _dir: dir,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    async fn add_hammer_and_nails(f: &Fixture) {
        add_item(&f.receipt, &f.config, "2", "Hammer", "500").await.unwrap();
        add_item(&f.receipt, &f.config, "1", "Nail box", "150").await.unwrap();
    }

    #[tokio::test]
    async fn test_first_session_gets_0001() {
        let f = fixture().await;
        let view = start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();
        assert_eq!(view.number, "0001");
        assert!(view.lines.is_empty());
        assert_eq!(view.total_cents, 0);
    }

    #[tokio::test]
    async fn test_finalize_saves_then_renders() {
        let f = fixture().await;
        start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();
        add_hammer_and_nails(&f).await;

        let done = finalize_session(&f.db, &f.receipt, &f.config, date()).await.unwrap();

        assert_eq!(done.number, "0001");
        assert_eq!(done.total_cents, 115_000);
        assert_eq!(done.total, "$1,150.00");
        assert!(!done.render_retry);
        assert!(done.document.ends_with("remito_0001.pdf"));
        assert!(std::fs::read(&done.document).unwrap().starts_with(b"%PDF"));

        let stored = f.db.inner().receipts().latest().await.unwrap().unwrap();
        assert_eq!(stored.receipt.number, ReceiptNumber::new(1));
        assert_eq!(stored.receipt.issued_on, date());
        assert_eq!(stored.receipt.total.cents(), 115_000);
        assert_eq!(stored.receipt.items.len(), 2);
        assert_eq!(stored.receipt.items[0].product(), "Hammer");

        let layout = f.config.renderer().layout(&stored.receipt);
        assert!(layout.find_text("Total: $1,150.00").is_some());

        let view = start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();
        assert_eq!(view.number, "0002");
    }

    #[tokio::test]
    async fn test_empty_receipt_writes_nothing() {
        let f = fixture().await;
        start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();

        let err = finalize_session(&f.db, &f.receipt, &f.config, date())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::EmptyReceipt);
        assert_eq!(f.db.inner().receipts().count().await.unwrap(), 0);
        assert!(!f.config.renderer().settings().output_dir.exists());
    }

    #[tokio::test]
    async fn test_finalize_without_session() {
        let f = fixture().await;
        let err = finalize_session(&f.db, &f.receipt, &f.config, date())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
    }

    #[tokio::test]
    async fn test_persistence_failure_prevents_render() {
        let f = fixture().await;
        start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();
        add_hammer_and_nails(&f).await;

        f.db.inner().close().await;
        let err = finalize_session(&f.db, &f.receipt, &f.config, date())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PersistenceError);
        let path = f.config.renderer().document_path(ReceiptNumber::new(1));
        assert!(!path.exists());

        let view = crate::commands::current_receipt(&f.receipt, &f.config).await.unwrap();
        assert_eq!(view.state, "open");
        assert_eq!(view.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_render_failure_keeps_receipt_and_retries() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("remitos");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let f = Fixture {
            db: DbState::new(Database::new(DbConfig::in_memory()).await.unwrap()),
            receipt: ReceiptState::new(),
            config: config_for(&blocker),
            _dir: dir,
        };
        start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();
        add_hammer_and_nails(&f).await;

        let err = finalize_session(&f.db, &f.receipt, &f.config, date())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RenderError);
        assert!(err.message.contains("0001"));
        assert_eq!(f.db.inner().receipts().count().await.unwrap(), 1);

        let view = crate::commands::current_receipt(&f.receipt, &f.config).await.unwrap();
        assert_eq!(view.state, "saved, render pending");
        assert_eq!(view.total_cents, 115_000);

        let err = add_item(&f.receipt, &f.config, "1", "Saw", "10").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);

        std::fs::remove_file(&blocker).unwrap();
        let done = finalize_session(&f.db, &f.receipt, &f.config, date()).await.unwrap();

        assert!(done.render_retry);
        assert_eq!(done.number, "0001");
        assert!(done.document.exists());
        assert_eq!(f.db.inner().receipts().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_finalized_session_rejects_second_finalize() {
        let f = fixture().await;
        start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();
        add_hammer_and_nails(&f).await;
        finalize_session(&f.db, &f.receipt, &f.config, date()).await.unwrap();

        let err = finalize_session(&f.db, &f.receipt, &f.config, date())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
        assert_eq!(f.db.inner().receipts().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_number_is_offered_again() {
        let f = fixture().await;
        start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();
        add_hammer_and_nails(&f).await;

        let view = start_new_session(&f.db, &f.receipt, &f.config).await.unwrap();

        assert_eq!(view.number, "0001");
        assert!(view.lines.is_empty());
        assert_eq!(f.db.inner().receipts().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_numbering_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("remitos.db");
        let config = config_for(&dir.path().join("out"));

        {
            let db = DbState::new(Database::new(DbConfig::new(&db_path)).await.unwrap());
            let receipt = ReceiptState::new();
            start_new_session(&db, &receipt, &config).await.unwrap();
            add_item(&receipt, &config, "3", "Screwdriver", "1200.50").await.unwrap();
            finalize_session(&db, &receipt, &config, date()).await.unwrap();
            db.inner().close().await;
        }

        let db = DbState::new(Database::new(DbConfig::new(&db_path)).await.unwrap());
        let receipt = ReceiptState::new();
        let view = start_new_session(&db, &receipt, &config).await.unwrap();
        assert_eq!(view.number, "0002");

        let stored = db
            .inner()
            .receipts()
            .get_by_number(ReceiptNumber::new(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.receipt.total.cents(), 360_150);
    }
}
