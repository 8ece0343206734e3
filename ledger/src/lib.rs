// Copyright (c) 2026 Kudi Labs. MIT License.
// See LICENSE for details.

//! # Kudi Ledger — Core Library
//!
//! Kudi is a wallet ledger: it records monetary movements (deposits, peer
//! transfers) against user wallets and keeps every balance consistent under
//! concurrent writes. Money is integers in minor units (kobo, cents) from
//! the moment it enters the system — floating point touches an amount
//! exactly once, at the input boundary, and is rounded away immediately.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of a
//! ledger:
//!
//! - **model** — The vocabulary: currencies, transaction kinds, row records,
//!   and the major/minor amount conversion.
//! - **store** — Durable relational persistence over SQLite. Owns the
//!   schema, the atomic-transaction primitive, and the server-side balance
//!   arithmetic.
//! - **engine** — The ledger operations: create-account, deposit, transfer,
//!   and the read paths. Each operation is exactly one store transaction.
//! - **error** — One error taxonomy for the whole crate. Every failure path
//!   has a distinguishable kind.
//! - **config** — Constants and limits.
//!
//! ## Design Philosophy
//!
//! 1. The wallet balance column is the only shared mutable resource, and it
//!    is only ever mutated server-side (`balance = balance + delta`).
//! 2. Either every row of an operation commits or none does. There is no
//!    observable debit-without-credit state, ever.
//! 3. A completed transaction row is append-only history. Nothing updates
//!    it, nothing deletes it.
//! 4. If it touches money, it has tests. Plural.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod store;

pub use engine::{
    CallerIdentity, CreateAccountInput, DepositInput, LedgerEngine, TransferInput,
    TransferReceipt, WalletOverview, WalletView,
};
pub use error::{LedgerError, LedgerResult};
pub use model::{AmountError, Currency, TransactionKind, TransactionRecord, TransactionStatus};
pub use model::{User, Wallet};
pub use store::LedgerDb;
