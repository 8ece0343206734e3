//! Enumerations shared across the ledger.
//!
//! Each enum round-trips through the exact text stored in the database's
//! constrained TEXT columns: `as_str` renders it, `FromStr` parses it, and
//! the schema's CHECK constraints admit nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Currencies the ledger provisions wallets for.
///
/// One wallet per (user, currency). Account creation currently provisions
/// NGN only; USD is in the schema so adding the second wallet is a data
/// change, not a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Nigerian Naira (minor unit: kobo, 10^-2).
    Ngn,
    /// United States Dollar (minor unit: cent, 10^-2).
    Usd,
}

impl Currency {
    /// The text stored in the `wallets.currency` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ngn => "NGN",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = UnknownEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NGN" => Ok(Self::Ngn),
            "USD" => Ok(Self::Usd),
            other => Err(UnknownEnumValue {
                column: "currency",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// Discriminant for what a ledger entry represents.
///
/// The kind determines how a row reads in a statement, not how it is
/// applied — application is always "add the signed amount to the balance".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// External money entering a wallet (gateway callback, bank credit).
    Deposit,
    /// External money leaving a wallet.
    Withdrawal,
    /// Peer-to-peer movement between two Kudi wallets. Always appears as a
    /// pair of rows: a negative one on the sender, a positive one on the
    /// recipient.
    Transfer,
    /// Interest credited by the platform.
    Interest,
    /// A fee debited by the platform.
    Fee,
}

impl TransactionKind {
    /// The text stored in the `transactions.type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
            Self::Interest => "interest",
            Self::Fee => "fee",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "transfer" => Ok(Self::Transfer),
            "interest" => Ok(Self::Interest),
            "fee" => Ok(Self::Fee),
            other => Err(UnknownEnumValue {
                column: "type",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a ledger entry.
///
/// Only `Completed` rows count toward a wallet's balance. `Pending` exists
/// for flows that settle asynchronously (none of the current operations
/// produce one — they validate and complete inside a single transaction),
/// and `Failed` preserves the audit trail of rejected settlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Recorded but not yet settled.
    Pending,
    /// Settled; included in the balance reconciliation sum.
    Completed,
    /// Rejected during settlement. Kept for the audit trail.
    Failed,
}

impl TransactionStatus {
    /// The text stored in the `transactions.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownEnumValue {
                column: "status",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// UnknownEnumValue
// ---------------------------------------------------------------------------

/// Parse failure for an enum column. Seeing one at runtime means the
/// database holds text this crate never wrote.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {column} value: {value:?}")]
pub struct UnknownEnumValue {
    /// Which column the bad value came from.
    pub column: &'static str,
    /// The offending text.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
