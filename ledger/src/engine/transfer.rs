//! Peer-to-peer transfers: the double-entry operation.
//!
//! A transfer is four writes — debit the sender's balance, credit the
//! recipient's, insert the debit row, insert the credit row — and all four
//! live or die together in one transaction. The balance check happens
//! twice: once as an early transaction-local read (cheap, gives the caller
//! the available/requested figures) and once inside the guarded decrement
//! itself, which is what actually makes overdraft impossible when two
//! transfers race on the same wallet.

use chrono::Utc;
use tracing::info;

use crate::config::{TRANSFER_IN_REF_PREFIX, TRANSFER_OUT_REF_PREFIX};
use crate::error::{LedgerError, LedgerResult};
use crate::model::{to_minor_units, Currency, TransactionKind, TransactionRecord};
use crate::store::LedgerDb;

use super::{generated_reference, LedgerEngine, TransferInput, TransferReceipt};

impl LedgerEngine {
    /// Moves funds between two users' NGN wallets, atomically.
    ///
    /// Returns a receipt carrying both ledger rows, so the caller can show
    /// a statement line without a follow-up read.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidAmount`], [`LedgerError::MissingWallet`] (the
    /// sender has no wallet), [`LedgerError::InsufficientFunds`],
    /// [`LedgerError::RecipientNotFound`], and
    /// [`LedgerError::SelfTransferNotAllowed`]. On any error — validation
    /// or mid-transaction — neither balance moves and no row is written.
    pub async fn transfer(&self, input: TransferInput) -> LedgerResult<TransferReceipt> {
        let amount = to_minor_units(input.amount)?;
        let recipient_email = input.recipient_email.trim().to_string();

        let mut tx = self.db.begin().await?;

        let sender_wallet =
            LedgerDb::get_wallet_for_user_in(&mut tx, &input.sender_id, Currency::Ngn)
                .await?
                .ok_or_else(|| LedgerError::MissingWallet {
                    wallet_id: input.sender_id.clone(),
                })?;

        if sender_wallet.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                available: sender_wallet.balance,
                requested: amount,
            });
        }

        let recipient = LedgerDb::get_user_by_email_in(&mut tx, &recipient_email)
            .await?
            .ok_or_else(|| LedgerError::RecipientNotFound {
                email: recipient_email.clone(),
            })?;
        if recipient.id == input.sender_id {
            return Err(LedgerError::SelfTransferNotAllowed);
        }
        let recipient_wallet =
            LedgerDb::get_wallet_for_user_in(&mut tx, &recipient.id, Currency::Ngn)
                .await?
                .ok_or_else(|| LedgerError::RecipientNotFound {
                    email: recipient_email.clone(),
                })?;

        let now = Utc::now();

        // The guard closes the read-then-debit race: if another transfer
        // drained the wallet since the read above, zero rows move and we
        // bail with the figures from the read.
        if LedgerDb::debit_balance(&mut tx, &sender_wallet.id, amount, now).await? == 0 {
            return Err(LedgerError::InsufficientFunds {
                available: sender_wallet.balance,
                requested: amount,
            });
        }
        if LedgerDb::credit_balance(&mut tx, &recipient_wallet.id, amount, now).await? == 0 {
            return Err(LedgerError::MissingWallet {
                wallet_id: recipient_wallet.id,
            });
        }

        let debit = TransactionRecord::completed(
            &sender_wallet.id,
            -amount,
            TransactionKind::Transfer,
            Some(generated_reference(TRANSFER_OUT_REF_PREFIX)),
            Some(format!("Transfer to {recipient_email}")),
        );
        let credit = TransactionRecord::completed(
            &recipient_wallet.id,
            amount,
            TransactionKind::Transfer,
            Some(generated_reference(TRANSFER_IN_REF_PREFIX)),
            Some(format!("Received from {}", input.sender_id)),
        );
        LedgerDb::insert_transaction(&mut tx, &debit).await?;
        LedgerDb::insert_transaction(&mut tx, &credit).await?;
        tx.commit().await?;

        info!(
            sender_wallet = %debit.wallet_id,
            recipient_wallet = %credit.wallet_id,
            amount,
            "transfer completed"
        );
        Ok(TransferReceipt { debit, credit })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
