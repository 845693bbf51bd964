// Path: crates/services/src/gradebook/allocator.rs

use gradebook_api::state::{read_u64, write_u64, StateAccess};
use gradebook_types::app::IdNamespace;
use gradebook_types::error::StateError;
use gradebook_types::keys::counter_key;

/// Mints sequential identifiers, one independent counter per namespace.
///
/// The counter stores the last value handed out, so it doubles as the number of
/// identifiers ever allocated in that namespace. The first call returns 1.
pub struct IdentifierAllocator;

impl IdentifierAllocator {
    pub fn next<S: StateAccess + ?Sized>(
        state: &mut S,
        namespace: IdNamespace,
    ) -> Result<u64, StateError> {
        let key = counter_key(namespace);
        let next = read_u64(state, &key)?.checked_add(1).ok_or_else(|| {
            StateError::WriteError(format!("{} identifier counter exhausted", namespace))
        })?;
        write_u64(state, &key, next)?;
        Ok(next)
    }

    /// The last identifier allocated in `namespace`, or 0 if none was.
    pub fn current<S: StateAccess + ?Sized>(
        state: &S,
        namespace: IdNamespace,
    ) -> Result<u64, StateError> {
        read_u64(state, &counter_key(namespace))
    }
}
