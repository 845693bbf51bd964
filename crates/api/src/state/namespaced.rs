// Path: crates/api/src/state/namespaced.rs

//! State access wrappers that confine a service to its own keyspace.

use crate::state::{StateAccess, StateError};

const SERVICE_DATA_ROOT: &[u8] = b"_service_data::";

/// Helper to generate a canonical namespace prefix for a service.
pub fn service_namespace_prefix(service_id: &str) -> Vec<u8> {
    format!("_service_data::{}::", service_id).into_bytes()
}

/// Qualifies a service-relative key. Raw `_service_data::` keys are refused so a
/// service cannot reach into another service's keyspace.
#[inline]
fn qualify(prefix: &[u8], key: &[u8]) -> Result<Vec<u8>, StateError> {
    if key.starts_with(SERVICE_DATA_ROOT) {
        return Err(StateError::PermissionDenied(format!(
            "attempted to access raw service data key '{}'",
            String::from_utf8_lossy(key)
        )));
    }
    Ok([prefix, key].concat())
}

/// A wrapper that provides namespaced, isolated access to a `StateAccess` object.
///
/// All keys are prefixed with `_service_data::{service_id}::`.
pub struct NamespacedStateAccess<'a> {
    inner: &'a mut dyn StateAccess,
    prefix: Vec<u8>,
}

impl<'a> NamespacedStateAccess<'a> {
    /// Creates a new namespaced state accessor for a service.
    pub fn new(inner: &'a mut dyn StateAccess, prefix: Vec<u8>) -> Self {
        Self { inner, prefix }
    }
}

impl<'a> StateAccess for NamespacedStateAccess<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.inner.get(&qualify(&self.prefix, key)?)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        let key = qualify(&self.prefix, key)?;
        self.inner.insert(&key, value)
    }

    fn batch_apply(&mut self, inserts: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        let mapped: Vec<(Vec<u8>, Vec<u8>)> = inserts
            .iter()
            .map(|(k, v)| qualify(&self.prefix, k).map(|qk| (qk, v.clone())))
            .collect::<Result<_, _>>()?;
        self.inner.batch_apply(&mapped)
    }
}

/// A read-only version of `NamespacedStateAccess` over an immutable reference.
///
/// Used for queries: reads are namespaced exactly like writes, and any attempt to
/// mutate fails with `PermissionDenied`.
pub struct ReadOnlyNamespacedStateAccess<'a> {
    inner: &'a dyn StateAccess,
    prefix: Vec<u8>,
}

impl<'a> ReadOnlyNamespacedStateAccess<'a> {
    /// Creates a new read-only namespaced state accessor.
    pub fn new(inner: &'a dyn StateAccess, prefix: Vec<u8>) -> Self {
        Self { inner, prefix }
    }
}

impl<'a> StateAccess for ReadOnlyNamespacedStateAccess<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.inner.get(&qualify(&self.prefix, key)?)
    }

    fn insert(&mut self, _key: &[u8], _value: &[u8]) -> Result<(), StateError> {
        Err(StateError::PermissionDenied(
            "Write attempted in read-only query context".into(),
        ))
    }

    fn batch_apply(&mut self, _inserts: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        Err(StateError::PermissionDenied(
            "Batch apply attempted in read-only query context".into(),
        ))
    }
}
