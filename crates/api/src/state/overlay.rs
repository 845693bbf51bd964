// Path: crates/api/src/state/overlay.rs

//! A copy-on-write state overlay that makes a write all-or-nothing.

use crate::state::{StateAccess, StateError, StateInserts};
use std::collections::BTreeMap;

/// An in-memory, copy-on-write overlay for any `StateAccess`.
///
/// Reads are first checked against the local `writes` cache. If a key is not
/// found, the read is passed through to the underlying `base` state.
/// All writes are captured in the local cache and do not affect the `base` state
/// until the caller commits the batch returned by `into_ordered_batch`. Dropping
/// the overlay discards them.
#[derive(Clone)]
pub struct StateOverlay<'a> {
    base: &'a dyn StateAccess,
    writes: BTreeMap<Vec<u8>, Vec<u8>>, // BTreeMap for deterministic commit order.
}

impl<'a> StateOverlay<'a> {
    /// Creates a new, empty overlay on top of a base state accessor.
    pub fn new(base: &'a dyn StateAccess) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// The number of distinct keys written so far.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consumes the overlay and returns its writes in key order.
    pub fn into_ordered_batch(self) -> StateInserts {
        self.writes.into_iter().collect()
    }
}

impl<'a> StateAccess for StateOverlay<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.writes.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn batch_apply(&mut self, inserts: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        for (key, value) in inserts {
            self.insert(key, value)?;
        }
        Ok(())
    }
}
