//! # Model Module — Ledger Vocabulary
//!
//! The types every other module speaks in:
//!
//! ```text
//! types.rs    — Currency, TransactionKind, TransactionStatus enums
//! amount.rs   — major-unit input -> minor-unit integer conversion
//! records.rs  — User, Wallet, TransactionRecord row types
//! ```
//!
//! ## Design Principles
//!
//! 1. **All stored amounts are `i64` in minor units.** Kobo and cents,
//!    never naira-and-a-fraction. Floating point exists only at the input
//!    boundary in `amount.rs` and is rounded away there.
//! 2. **Enums round-trip through text.** The store keeps enum columns as
//!    constrained TEXT; every enum here parses back from exactly the string
//!    it renders to.
//! 3. **Rows are plain data.** No behavior beyond construction and
//!    formatting — mutation happens in the engine, through the store.

pub mod amount;
pub mod records;
pub mod types;

pub use amount::{to_major_units, to_minor_units, AmountError};
pub use records::{TransactionRecord, User, Wallet};
pub use types::{Currency, TransactionKind, TransactionStatus};
