//! # Error Taxonomy
//!
//! One error type for the whole ledger, split along the lines callers care
//! about: input-validation failures (rejected before any transaction
//! begins), business-rule violations (detected inside the transaction,
//! cause a full rollback), and storage failures (generic, never retried
//! here — retry policy belongs to the caller).
//!
//! Every failure path returns a distinguishable kind. Programmatic callers
//! branch on the variant; humans get the `Display` message.

use crate::model::AmountError;

/// Errors returned by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Account creation was attempted without an email address.
    #[error("email is required")]
    MissingEmail,

    /// The email is already registered. Surfaced from the unique constraint
    /// on `users.email`, so a registration race loses cleanly.
    #[error("an account already exists for {email}")]
    DuplicateAccount {
        /// The email that collided.
        email: String,
    },

    /// The amount failed conversion to minor units (non-positive,
    /// non-finite, or out of range).
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// The wallet a mutation targeted does not exist.
    #[error("no wallet with id {wallet_id}")]
    MissingWallet {
        /// The wallet id that didn't resolve.
        wallet_id: String,
    },

    /// A deposit reference collided with an existing transaction row.
    ///
    /// This is the at-most-once mechanism for retried gateway callbacks:
    /// callers must treat this as "already processed", not as a failure of
    /// the deposit itself.
    #[error("a transaction with reference {reference} already exists")]
    DuplicateReference {
        /// The reference that collided.
        reference: String,
    },

    /// The sender's balance cannot cover the requested debit. The wallet
    /// and the ledger are untouched.
    #[error("insufficient funds: available {available}, requested {requested} (minor units)")]
    InsufficientFunds {
        /// Balance at the time of the check, in minor units.
        available: i64,
        /// The debit that was requested, in minor units.
        requested: i64,
    },

    /// No account (user + wallet) matches the recipient email.
    #[error("no recipient account for {email}")]
    RecipientNotFound {
        /// The email that didn't resolve.
        email: String,
    },

    /// Sender and recipient are the same account.
    #[error("cannot transfer to your own wallet")]
    SelfTransferNotAllowed,

    /// A read-path lookup found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored row failed to decode (bad enum text, mangled timestamp).
    /// This means the database was written by something other than this
    /// crate, which is a deployment problem, not a caller problem.
    #[error("corrupt ledger row: {0}")]
    CorruptRecord(String),

    /// Any other storage-layer failure: connection loss, constraint
    /// violation not anticipated by validation, lock conflict. The
    /// enclosing transaction has been rolled back; no partial state exists.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Convenience alias used throughout the crate.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Returns `true` if the sqlx error is a unique-constraint violation.
///
/// Used to turn constraint collisions on `users.email` and
/// `transactions.reference` into their specific business-rule variants
/// instead of a generic storage failure.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
