//! Read paths. Pure queries — no transaction, no side effects.

use crate::config::{DEFAULT_OVERVIEW_LIMIT, MAX_OVERVIEW_LIMIT};
use crate::error::{LedgerError, LedgerResult};
use crate::model::Currency;

use super::{LedgerEngine, WalletOverview, WalletView};

impl LedgerEngine {
    /// Fetches a wallet by id.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] if no wallet has that id.
    pub async fn get_wallet(&self, wallet_id: &str) -> LedgerResult<WalletView> {
        self.db
            .get_wallet(wallet_id)
            .await?
            .map(WalletView::from)
            .ok_or_else(|| LedgerError::NotFound(format!("wallet {wallet_id}")))
    }

    /// The dashboard read: a user's NGN wallet plus their most recent
    /// activity, newest first.
    ///
    /// `limit` defaults to [`DEFAULT_OVERVIEW_LIMIT`] and is clamped to
    /// `1..=`[`MAX_OVERVIEW_LIMIT`] — this path serves a widget, not a
    /// statement export.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] if the user has no wallet.
    pub async fn wallet_overview(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> LedgerResult<WalletOverview> {
        let limit = limit
            .unwrap_or(DEFAULT_OVERVIEW_LIMIT)
            .clamp(1, MAX_OVERVIEW_LIMIT);

        let wallet = self
            .db
            .get_wallet_for_user(user_id, Currency::Ngn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("no wallet for user {user_id}")))?;

        let recent_transactions = self.db.recent_transactions(&wallet.id, limit).await?;
        Ok(WalletOverview {
            wallet: WalletView::from(wallet),
            recent_transactions,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
