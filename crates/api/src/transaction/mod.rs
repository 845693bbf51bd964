// Path: crates/api/src/transaction/mod.rs
//! Execution context for ledger writes.

pub mod context;
