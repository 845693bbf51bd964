// Path: crates/api/src/state/tests.rs
use super::*;
use std::collections::HashMap;

// Mock state implementation
#[derive(Debug, Clone, Default)]
struct MockState {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl StateAccess for MockState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn batch_apply(&mut self, inserts: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        for (key, value) in inserts {
            self.insert(key, value)?;
        }
        Ok(())
    }
}

#[test]
fn overlay_reads_through_and_buffers_writes() {
    let mut base = MockState::default();
    base.insert(b"a", b"1").unwrap();

    let mut overlay = StateOverlay::new(&base);
    assert_eq!(overlay.get(b"a").unwrap(), Some(b"1".to_vec()));

    overlay.insert(b"a", b"2").unwrap();
    overlay.insert(b"b", b"3").unwrap();
    assert_eq!(overlay.get(b"a").unwrap(), Some(b"2".to_vec()));
    assert_eq!(overlay.len(), 2);

    // The base is untouched until the batch is applied.
    assert_eq!(base.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(base.get(b"b").unwrap(), None);
}

#[test]
fn overlay_batch_is_key_ordered_and_commits() {
    let mut base = MockState::default();
    let batch = {
        let mut overlay = StateOverlay::new(&base);
        overlay.insert(b"z", b"last").unwrap();
        overlay.insert(b"m", b"mid").unwrap();
        overlay.insert(b"a", b"first").unwrap();
        overlay.into_ordered_batch()
    };
    let keys: Vec<&[u8]> = batch.iter().map(|(k, _)| k.as_slice()).collect();
    assert_eq!(keys, vec![&b"a"[..], &b"m"[..], &b"z"[..]]);

    base.batch_apply(&batch).unwrap();
    assert_eq!(base.get(b"m").unwrap(), Some(b"mid".to_vec()));
}

#[test]
fn dropped_overlay_leaves_no_trace() {
    let base = MockState::default();
    {
        let mut overlay = StateOverlay::new(&base);
        overlay.insert(b"k", b"v").unwrap();
    }
    assert!(base.data.is_empty());
}

#[test]
fn namespaced_access_prefixes_keys() {
    let mut base = MockState::default();
    {
        let mut ns = NamespacedStateAccess::new(&mut base, service_namespace_prefix("svc"));
        ns.insert(b"key", b"v").unwrap();
        assert_eq!(ns.get(b"key").unwrap(), Some(b"v".to_vec()));
    }
    assert_eq!(
        base.get(b"_service_data::svc::key").unwrap(),
        Some(b"v".to_vec())
    );
    assert_eq!(base.get(b"key").unwrap(), None);
}

#[test]
fn namespaced_access_refuses_raw_service_keys() {
    let mut base = MockState::default();
    let mut ns = NamespacedStateAccess::new(&mut base, service_namespace_prefix("svc"));
    let err = ns.insert(b"_service_data::other::key", b"v").unwrap_err();
    assert!(matches!(err, StateError::PermissionDenied(_)));
}

#[test]
fn read_only_access_rejects_writes() {
    let mut base = MockState::default();
    base.insert(b"_service_data::svc::k", b"v").unwrap();

    let mut ro = ReadOnlyNamespacedStateAccess::new(&base, service_namespace_prefix("svc"));
    assert_eq!(ro.get(b"k").unwrap(), Some(b"v".to_vec()));
    assert!(matches!(
        ro.insert(b"k", b"w"),
        Err(StateError::PermissionDenied(_))
    ));
    assert!(matches!(
        ro.batch_apply(&[(b"k".to_vec(), b"w".to_vec())]),
        Err(StateError::PermissionDenied(_))
    ));
}

#[test]
fn u64_helpers_default_to_zero_and_validate_width() {
    let mut state = MockState::default();
    assert_eq!(read_u64(&state, b"n").unwrap(), 0);
    write_u64(&mut state, b"n", 42).unwrap();
    assert_eq!(read_u64(&state, b"n").unwrap(), 42);

    state.insert(b"bad", b"xyz").unwrap();
    assert!(matches!(
        read_u64(&state, b"bad"),
        Err(StateError::InvalidValue(_))
    ));
}
