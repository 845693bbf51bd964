// Path: crates/storage/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! Storage backends for the gradebook ledger.
//!
//! The canonical state lives in a `MemoryStore`. Durability comes from the
//! write-ahead log: every committed change set is appended before it is applied,
//! and opening a ledger replays the log into a fresh store.

pub mod memory;
pub mod wal;

pub use memory::MemoryStore;
pub use wal::{recover, WalEntry, WalIterator, WalWriter};
