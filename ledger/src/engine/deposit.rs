//! Deposits: external money entering a wallet.
//!
//! The balance write goes first inside the transaction. Writes queue on
//! SQLite's write lock, so concurrent deposits against the same wallet
//! serialize instead of conflicting, and `balance = balance + delta` makes
//! lost updates impossible regardless of interleaving.

use chrono::Utc;
use tracing::info;

use crate::config::DEPOSIT_REF_PREFIX;
use crate::error::{is_unique_violation, LedgerError, LedgerResult};
use crate::model::{to_minor_units, TransactionKind, TransactionRecord};
use crate::store::LedgerDb;

use super::{generated_reference, DepositInput, LedgerEngine};

impl LedgerEngine {
    /// Credits a wallet and records the completed deposit row, atomically.
    ///
    /// The reference is the idempotency key: a gateway retrying a callback
    /// with the same reference gets [`LedgerError::DuplicateReference`] and
    /// the money moves exactly once. Callers that don't supply one get a
    /// generated `REF-<uuid>`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidAmount`] before any transactional work,
    /// [`LedgerError::MissingWallet`] if the wallet id doesn't resolve,
    /// [`LedgerError::DuplicateReference`] on a reference collision. On any
    /// error the balance is untouched and no row exists.
    pub async fn deposit(&self, input: DepositInput) -> LedgerResult<TransactionRecord> {
        let amount = to_minor_units(input.amount)?;
        let reference = match input.reference.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => generated_reference(DEPOSIT_REF_PREFIX),
        };

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        if LedgerDb::credit_balance(&mut tx, &input.wallet_id, amount, now).await? == 0 {
            return Err(LedgerError::MissingWallet {
                wallet_id: input.wallet_id,
            });
        }

        let record = TransactionRecord::completed(
            &input.wallet_id,
            amount,
            TransactionKind::Deposit,
            Some(reference.clone()),
            Some("Wallet Deposit".to_string()),
        );
        match LedgerDb::insert_transaction(&mut tx, &record).await {
            Ok(()) => {
                tx.commit().await?;
                info!(wallet_id = %record.wallet_id, amount, reference = %reference, "deposit completed");
                Ok(record)
            }
            // Rolls back the credit along with the insert.
            Err(LedgerError::Storage(e)) if is_unique_violation(&e) => {
                Err(LedgerError::DuplicateReference { reference })
            }
            Err(other) => Err(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
