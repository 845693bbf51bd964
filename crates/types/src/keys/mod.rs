// Path: crates/types/src/keys/mod.rs
//! Defines the state keys used by the gradebook service.
//!
//! All keys are relative to the service's private namespace (see
//! `gradebook_api::state::service_namespace_prefix`). Numeric components are
//! encoded as little-endian `u64`.

use crate::app::{AccountId, EvaluationId, IdNamespace, RecorderId, StudentId, StudentText};

/// The service identifier, also used as its state namespace.
pub const GRADEBOOK_SERVICE_ID: &str = "gradebook";

/// State key prefix for the per-namespace identifier counters.
pub const COUNTER_PREFIX: &[u8] = b"counter::";

/// State key prefix mapping a student text to its ID.
pub const STUDENT_BY_TEXT_PREFIX: &[u8] = b"students::by_text::";
/// State key prefix mapping a student ID to its text.
pub const STUDENT_BY_ID_PREFIX: &[u8] = b"students::by_id::";

/// State key prefix mapping a recorder identity to its ID.
pub const RECORDER_BY_ACCOUNT_PREFIX: &[u8] = b"recorders::by_account::";
/// State key prefix mapping a recorder ID to its identity.
pub const RECORDER_BY_ID_PREFIX: &[u8] = b"recorders::by_id::";

/// State key prefix for evaluation log entries, keyed by evaluation ID.
pub const EVALUATION_ENTRY_PREFIX: &[u8] = b"evaluations::entry::";
/// State key prefix for the by-recorder secondary index.
pub const EVALUATION_BY_RECORDER_PREFIX: &[u8] = b"evaluations::by_recorder::";
/// State key prefix for the by-student secondary index.
pub const EVALUATION_BY_STUDENT_PREFIX: &[u8] = b"evaluations::by_student::";

const INDEX_LEN_SUFFIX: &[u8] = b"::len";

/// The counter key for an identifier namespace.
///
/// # Example
/// `counter_key(IdNamespace::Students)` -> `b"counter::students"`
pub fn counter_key(namespace: IdNamespace) -> Vec<u8> {
    [COUNTER_PREFIX, namespace.as_str().as_bytes()].concat()
}

/// The key holding the ID bound to a student text.
pub fn student_by_text_key(text: &StudentText) -> Vec<u8> {
    [STUDENT_BY_TEXT_PREFIX, text.as_ref()].concat()
}

/// The key holding the text bound to a student ID.
pub fn student_by_id_key(id: StudentId) -> Vec<u8> {
    [STUDENT_BY_ID_PREFIX, &id.0.to_le_bytes()].concat()
}

/// The key holding the ID bound to a recorder identity.
pub fn recorder_by_account_key(account: &AccountId) -> Vec<u8> {
    [RECORDER_BY_ACCOUNT_PREFIX, account.as_ref()].concat()
}

/// The key holding the identity bound to a recorder ID.
pub fn recorder_by_id_key(id: RecorderId) -> Vec<u8> {
    [RECORDER_BY_ID_PREFIX, &id.0.to_le_bytes()].concat()
}

/// The key holding the log entry for an evaluation.
pub fn evaluation_entry_key(id: EvaluationId) -> Vec<u8> {
    [EVALUATION_ENTRY_PREFIX, &id.0.to_le_bytes()].concat()
}

/// The key holding the length of a recorder's index.
pub fn by_recorder_len_key(id: RecorderId) -> Vec<u8> {
    [EVALUATION_BY_RECORDER_PREFIX, &id.0.to_le_bytes(), INDEX_LEN_SUFFIX].concat()
}

/// The key holding the evaluation ID at `index` in a recorder's index.
pub fn by_recorder_slot_key(id: RecorderId, index: u64) -> Vec<u8> {
    [
        EVALUATION_BY_RECORDER_PREFIX,
        &id.0.to_le_bytes(),
        b"::",
        &index.to_le_bytes(),
    ]
    .concat()
}

/// The key holding the length of a student's index.
pub fn by_student_len_key(id: StudentId) -> Vec<u8> {
    [EVALUATION_BY_STUDENT_PREFIX, &id.0.to_le_bytes(), INDEX_LEN_SUFFIX].concat()
}

/// The key holding the evaluation ID at `index` in a student's index.
pub fn by_student_slot_key(id: StudentId, index: u64) -> Vec<u8> {
    [
        EVALUATION_BY_STUDENT_PREFIX,
        &id.0.to_le_bytes(),
        b"::",
        &index.to_le_bytes(),
    ]
    .concat()
}
