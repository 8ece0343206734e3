//! # Store Module — Durable Relational Persistence
//!
//! Everything on disk flows through [`db::LedgerDb`]. The store owns the
//! schema, the column-level integrity constraints, the atomic-transaction
//! primitive, and the server-side balance arithmetic. The engine decides
//! *what* to write; the store guarantees *how* it lands: all-or-nothing,
//! constraint-checked, with no client-side read-modify-write on balances.

pub mod db;

pub use db::LedgerDb;
