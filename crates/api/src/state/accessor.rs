// Path: crates/api/src/state/accessor.rs
//! Defines the `StateAccess` trait for key-value storage operations.

use crate::state::StateError;

/// A batch of key-value pairs to be inserted or updated in the state.
pub type StateInserts = Vec<(Vec<u8>, Vec<u8>)>;

/// A dyn-safe trait for the ledger's key-value state.
///
/// The ledger is append-only, so there is no delete: every key, once written, keeps
/// a value for the lifetime of the store.
pub trait StateAccess: Send + Sync {
    /// Gets a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    /// Inserts or overwrites a key-value pair.
    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError>;

    /// Applies a batch of inserts as a single unit.
    /// This is the method used to commit a write's change set.
    fn batch_apply(&mut self, inserts: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError>;
}
