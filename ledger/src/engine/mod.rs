//! # Ledger Engine — The Operation Surface
//!
//! [`LedgerEngine`] is the only way money moves. It owns no state beyond a
//! handle to the store; every operation validates its input up front, then
//! performs exactly one store transaction. If the operation returns an
//! error, the database looks exactly as it did before the call.
//!
//! ## Operations
//!
//! | Operation                                   | File          |
//! |---------------------------------------------|---------------|
//! | [`create_account`](LedgerEngine::create_account), [`ensure_account`](LedgerEngine::ensure_account) | `account.rs`  |
//! | [`deposit`](LedgerEngine::deposit)          | `deposit.rs`  |
//! | [`transfer`](LedgerEngine::transfer)        | `transfer.rs` |
//! | [`get_wallet`](LedgerEngine::get_wallet), [`wallet_overview`](LedgerEngine::wallet_overview) | `query.rs`    |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{to_major_units, Currency, TransactionRecord, Wallet};
use crate::store::LedgerDb;

mod account;
mod deposit;
mod query;
mod transfer;

// ---------------------------------------------------------------------------
// LedgerEngine
// ---------------------------------------------------------------------------

/// The ledger's operation surface.
///
/// Holds the store handle injected at construction — no globals, no lazy
/// statics. Cheap to clone; clones share the underlying pool.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    db: LedgerDb,
}

impl LedgerEngine {
    /// Builds an engine over an opened store.
    pub fn new(db: LedgerDb) -> Self {
        Self { db }
    }

    /// Direct store access, for read-only diagnostics (counts, status).
    pub fn db(&self) -> &LedgerDb {
        &self.db
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Input for [`LedgerEngine::create_account`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountInput {
    /// Unique email for the new account.
    pub email: String,
    /// Optional display name.
    pub full_name: Option<String>,
}

/// The authenticated caller, as asserted by whatever sits in front of the
/// ledger. Identity management is out of scope here: the id is trusted as
/// given, and [`LedgerEngine::ensure_account`] will provision a ledger
/// account under it on first contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Externally-issued stable user id.
    pub id: String,
    /// The caller's email.
    pub email: String,
    /// Optional display name.
    pub full_name: Option<String>,
}

/// Input for [`LedgerEngine::deposit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositInput {
    /// The wallet receiving the funds.
    pub wallet_id: String,
    /// Amount in major units (naira). Converted to minor units on entry.
    pub amount: f64,
    /// External reference for idempotent retries. Generated when absent.
    pub reference: Option<String>,
}

/// Input for [`LedgerEngine::transfer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferInput {
    /// The sending user (not wallet — the sender's NGN wallet is resolved).
    pub sender_id: String,
    /// The recipient, addressed by email.
    pub recipient_email: String,
    /// Amount in major units.
    pub amount: f64,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// A wallet as presented to callers: the stored row plus the major-unit
/// rendering of the balance, so clients never re-derive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletView {
    /// Wallet id.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Denomination.
    pub currency: Currency,
    /// Balance in minor units — the authoritative figure.
    pub balance: i64,
    /// Balance in major units, display only.
    pub balance_major: f64,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last balance mutation time.
    pub updated_at: DateTime<Utc>,
}

impl From<Wallet> for WalletView {
    fn from(w: Wallet) -> Self {
        Self {
            balance_major: to_major_units(w.balance),
            id: w.id,
            user_id: w.user_id,
            currency: w.currency,
            balance: w.balance,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

/// Result of a completed transfer: both sides of the double entry.
///
/// Callers get the actual ledger rows, not a bare success flag, so receipts
/// can be rendered (and audited) without a follow-up query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// The sender's debit row (negative amount).
    pub debit: TransactionRecord,
    /// The recipient's credit row (positive amount).
    pub credit: TransactionRecord,
}

/// A wallet together with its most recent activity — the dashboard read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletOverview {
    /// The wallet.
    pub wallet: WalletView,
    /// Most recent entries, newest first.
    pub recent_transactions: Vec<TransactionRecord>,
}

// ---------------------------------------------------------------------------
// Reference generation
// ---------------------------------------------------------------------------

/// Builds a fresh external reference: `<prefix>-<uuid>`.
///
/// UUIDv4 rather than a timestamp, so two references minted in the same
/// instant can never collide on the unique column.
pub(crate) fn generated_reference(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
