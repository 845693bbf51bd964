// Path: crates/execution/src/lib.rs
//! # Gradebook Execution Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote robust
//! error handling.
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
//! # Gradebook Execution
//!
//! This crate provides `LedgerMachine`, the single-writer coordinator that runs every
//! write against a transactional overlay, makes it durable in the write-ahead log,
//! applies it, and only then publishes its notifications.

pub mod machine;
pub mod reader;

pub use machine::LedgerMachine;
pub use reader::LedgerReader;
