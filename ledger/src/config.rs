//! # Ledger Configuration & Constants
//!
//! Every magic number in Kudi lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// Minor units per major unit for every supported currency.
/// 100 kobo to the naira, 100 cents to the dollar. If we ever support a
/// currency with a different scale, this becomes a method on `Currency`.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Largest amount (in minor units) a single operation may move.
///
/// One quadrillion kobo = ten trillion naira. Well past any legitimate
/// deposit, and comfortably inside the range where an `f64` major-unit
/// input still converts to minor units without precision loss.
pub const MAX_AMOUNT_MINOR: i64 = 1_000_000_000_000_000;

// ---------------------------------------------------------------------------
// Transaction References
// ---------------------------------------------------------------------------

/// Prefix for generated deposit references when the caller (usually a
/// payment gateway callback) didn't supply one.
pub const DEPOSIT_REF_PREFIX: &str = "REF";

/// Prefix for the debit side of a transfer.
pub const TRANSFER_OUT_REF_PREFIX: &str = "TRF-OUT";

/// Prefix for the credit side of a transfer.
pub const TRANSFER_IN_REF_PREFIX: &str = "TRF-IN";

// ---------------------------------------------------------------------------
// Field Limits
// ---------------------------------------------------------------------------

/// Maximum email length. Matches the varchar(255) column.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Maximum external reference length. Matches the varchar(255) column.
pub const MAX_REFERENCE_LENGTH: usize = 255;

/// Maximum transaction description length.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

// ---------------------------------------------------------------------------
// Query Defaults
// ---------------------------------------------------------------------------

/// Default number of recent transactions returned by the wallet overview.
/// Five is what the account dashboard shows above the fold.
pub const DEFAULT_OVERVIEW_LIMIT: u32 = 5;

/// Hard ceiling on the overview limit, so a caller can't ask for the whole
/// ledger through the read path meant for a dashboard widget.
pub const MAX_OVERVIEW_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// How long a connection waits on SQLite's write lock before giving up.
/// Transfers and deposits against a hot wallet queue here; five seconds is
/// an eternity for single-row writes.
pub const DB_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool size for file-backed stores.
pub const DB_MAX_CONNECTIONS: u32 = 8;

/// Filename of the ledger database inside the data directory.
pub const DB_FILENAME: &str = "ledger.db";

// ---------------------------------------------------------------------------
// Server Defaults
// ---------------------------------------------------------------------------

/// Default HTTP API port.
pub const DEFAULT_RPC_PORT: u16 = 8460;

/// Default Prometheus metrics port.
pub const DEFAULT_METRICS_PORT: u16 = 8461;
