// Path: crates/api/src/lib.rs
#![forbid(unsafe_code)]
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

//! # Gradebook API
//!
//! The traits that separate the ledger's business logic from its storage and
//! execution environment: key-value state access, transactional overlays,
//! per-service namespacing, the execution context and the service dispatch trait.

/// Traits for pluggable ledger services.
pub mod services;
/// Key-value state access and transactional overlays.
pub mod state;
/// The execution context handed to services.
pub mod transaction;
