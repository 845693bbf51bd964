// Path: crates/api/src/state/mod.rs
//! Core traits for state management.
//!
//! - `StateAccess`: basic key-value store operations.
//! - `StateOverlay`: a copy-on-write layer capturing one write's changes.
//! - `NamespacedStateAccess` / `ReadOnlyNamespacedStateAccess`: isolate a service's
//!   keys under a private prefix.

pub use gradebook_types::error::StateError;

mod accessor;
pub mod namespaced;
mod overlay;

pub use accessor::*;
pub use namespaced::{service_namespace_prefix, NamespacedStateAccess, ReadOnlyNamespacedStateAccess};
pub use overlay::*;

/// Reads a little-endian `u64` stored under `key`, treating an absent key as zero.
pub fn read_u64<S: StateAccess + ?Sized>(state: &S, key: &[u8]) -> Result<u64, StateError> {
    match state.get(key)? {
        None => Ok(0),
        Some(bytes) => {
            let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                StateError::InvalidValue(format!(
                    "expected 8-byte counter under '{}', found {} bytes",
                    String::from_utf8_lossy(key),
                    bytes.len()
                ))
            })?;
            Ok(u64::from_le_bytes(arr))
        }
    }
}

/// Writes `value` as a little-endian `u64` under `key`.
pub fn write_u64<S: StateAccess + ?Sized>(
    state: &mut S,
    key: &[u8],
    value: u64,
) -> Result<(), StateError> {
    state.insert(key, &value.to_le_bytes())
}

#[cfg(test)]
mod tests;
