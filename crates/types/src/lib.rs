// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Gradebook Types
//!
//! This crate is the foundational library for the gradebook ledger, containing the
//! identifiers, evaluation records, error types and configuration objects shared by
//! every other crate in the workspace.
//!
//! ## Architectural Role
//!
//! As the base crate, `gradebook-types` has minimal dependencies. Keeping the
//! canonical definitions of `StudentId`, `AccountId`, `Score` and the error enums here
//! prevents circular dependencies between the storage, service and execution layers.

/// Ledger data structures: identifiers, text identifiers, scores, records and events.
pub mod app;
/// The canonical, deterministic binary codec for persisted state.
pub mod codec;
/// Configuration structures for a ledger instance.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Constants and builders for the state keys used by the gradebook service.
pub mod keys;
