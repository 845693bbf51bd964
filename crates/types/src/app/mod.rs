// Path: crates/types/src/app/mod.rs
//! Core application-level data structures for the gradebook ledger.

/// Observable notifications emitted after a write commits.
pub mod events;
/// Evaluation records, scores and their decoded views.
pub mod evaluation;
/// Numeric identifiers, caller identities and fixed-width text identifiers.
pub mod identity;

pub use events::*;
pub use evaluation::*;
pub use identity::*;
