//! # Receipt State
//!
//! Holds the receipt session the operator is working on.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Console            Command                 Session change              │
//! │  ───────            ───────                 ──────────────              │
//! │                                                                         │
//! │  new  ────────────► start_new_session() ──► Some(Session::new(n))      │
//! │  add  ────────────► add_item()  ──────────► ledger.push(line)          │
//! │  rm   ────────────► remove_selected() ────► ledger.remove(ids)         │
//! │  done ────────────► finalize_session() ───► Open → RenderPending       │
//! │                                                       → Finalized      │
//! │                                                                         │
//! │  The lock is held for the whole finalize so a second request cannot   │
//! │  save the same receipt twice.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use remito_core::Session;

/// The current session, if any.
#[derive(Debug, Clone, Default)]
pub struct ReceiptState {
    session: Arc<Mutex<Option<Session>>>,
}

impl ReceiptState {
    /// Creates state with no session started.
    pub fn new() -> Self {
        ReceiptState::default()
    }

    /// Locks the session slot.
    pub async fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().await
    }

    /// Executes a function with read access to the session.
    pub async fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&Session>) -> R,
    {
        let guard = self.session.lock().await;
        f(guard.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use remito_core::ReceiptNumber;

    #[tokio::test]
    async fn test_starts_empty() {
        let state = ReceiptState::new();
        assert!(state.with_session(|s| s.is_none()).await);
    }

    #[tokio::test]
    async fn test_clones_share_session() {
        let state = ReceiptState::new();
        let other = state.clone();

        *state.lock().await = Some(Session::new(ReceiptNumber::new(3), Utc::now()));

        let number = other.with_session(|s| s.map(Session::number)).await;
        assert_eq!(number, Some(ReceiptNumber::new(3)));
    }
}
