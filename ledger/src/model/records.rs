//! Row types for the three ledger tables.
//!
//! These are plain data carriers: the store reads and writes them, the
//! engine decides when. Ids are UUIDv4 rendered as hyphenated strings —
//! the ledger never interprets their structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Currency, TransactionKind, TransactionStatus};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// An account holder. Created once, never deleted in normal operation.
///
/// Owns exactly one wallet per currency (currently one, NGN, provisioned
/// at creation — a user row never exists without it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Primary key. UUIDv4 for self-registration; callers provisioning
    /// lazily from an identity provider supply the provider's id instead.
    pub id: String,
    /// Unique login/contact email.
    pub email: String,
    /// Optional display name.
    pub full_name: Option<String>,
    /// When the row was created (UTC).
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new user row with a fresh id and the current timestamp.
    pub fn new(email: &str, full_name: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: full_name.map(str::to_string),
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// One wallet per (user, currency).
///
/// `balance` is minor units and is never written directly by anything but
/// the store's server-side increment/decrement — the engine does not
/// compute balances in process space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Primary key, UUIDv4.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Wallet denomination.
    pub currency: Currency,
    /// Current balance in minor units. Invariant: never negative.
    pub balance: i64,
    /// When the row was created (UTC).
    pub created_at: DateTime<Utc>,
    /// Refreshed on every balance mutation (UTC).
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Builds a fresh zero-balance wallet for the given user.
    pub fn new(user_id: &str, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            currency,
            balance: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionRecord
// ---------------------------------------------------------------------------

/// An immutable ledger entry. Once completed, never mutated or deleted —
/// the transactions table is the append-only audit log, and the sum of a
/// wallet's completed amounts must always equal its balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Primary key, UUIDv4.
    pub id: String,
    /// The wallet this entry belongs to.
    pub wallet_id: String,
    /// Signed amount in minor units: positive = credit, negative = debit.
    pub amount: i64,
    /// What the entry represents.
    pub kind: TransactionKind,
    /// Settlement state. Only `Completed` rows count toward the balance.
    pub status: TransactionStatus,
    /// Unique external reference — the idempotency/reconciliation key.
    /// Generated when the caller doesn't supply one.
    pub reference: Option<String>,
    /// Free-text statement line.
    pub description: Option<String>,
    /// When the row was created (UTC).
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Builds a completed ledger entry with a fresh id.
    pub fn completed(
        wallet_id: &str,
        amount: i64,
        kind: TransactionKind,
        reference: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            wallet_id: wallet_id.to_string(),
            amount,
            kind,
            status: TransactionStatus::Completed,
            reference,
            description,
            created_at: Utc::now(),
        }
    }

    /// `true` for entries that move money out of the wallet.
    pub fn is_debit(&self) -> bool {
        self.amount < 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
