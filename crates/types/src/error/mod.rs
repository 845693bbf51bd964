// Path: crates/types/src/error/mod.rs
//! Core error types for the gradebook ledger.

use crate::app::{ScoreField, StudentText};
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors related to the state store or its persistence.
#[derive(Error, Debug)]
pub enum StateError {
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// An error occurred while writing to the state or its log.
    #[error("State write error: {0}")]
    WriteError(String),
    /// The stored value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The operation was denied due to insufficient permissions on a state key.
    #[error("Permission denied for state key: {0}")]
    PermissionDenied(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::WriteError(_) => "STATE_WRITE_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
            Self::PermissionDenied(_) => "STATE_PERMISSION_DENIED",
        }
    }
}

/// Errors raised by the registries and the evaluation ledger.
///
/// All of them are detected before any state mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradeBookError {
    /// A student with this text identifier already exists.
    #[error("Student '{0}' is already registered")]
    DuplicateStudent(StudentText),
    /// The student ID is zero or was never allocated.
    #[error("Invalid student ID: {0}")]
    InvalidStudentId(u64),
    /// The recorder ID is zero or was never allocated.
    #[error("Invalid recorder ID: {0}")]
    InvalidRecorderId(u64),
    /// An evaluation ID or per-key local index is past the end of its sequence.
    #[error("Evaluation index {index} out of bounds (length {len})")]
    InvalidEvaluationIndex {
        /// The requested index.
        index: u64,
        /// The current length of the sequence.
        len: u64,
    },
    /// A score does not fit the stored byte range.
    #[error("Score '{field}' out of range: {value} (allowed 0..=255)")]
    ScoreOutOfRange {
        /// The offending score field.
        field: ScoreField,
        /// The submitted scaled value.
        value: i64,
    },
}

impl ErrorCode for GradeBookError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateStudent(_) => "GRADEBOOK_DUPLICATE_STUDENT",
            Self::InvalidStudentId(_) => "GRADEBOOK_INVALID_STUDENT_ID",
            Self::InvalidRecorderId(_) => "GRADEBOOK_INVALID_RECORDER_ID",
            Self::InvalidEvaluationIndex { .. } => "GRADEBOOK_INVALID_EVALUATION_INDEX",
            Self::ScoreOutOfRange { .. } => "GRADEBOOK_SCORE_OUT_OF_RANGE",
        }
    }
}

/// Errors returned by service entry points.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// An error occurred during serialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// An error occurred during deserialization.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// The call inputs are malformed.
    #[error("Invalid transaction input: {0}")]
    InvalidInput(String),
    /// An error originating from the gradebook registries or ledger.
    #[error("Gradebook error: {0}")]
    GradeBook(#[from] GradeBookError),
    /// An error originating from the state store.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// The requested method is not supported by the service.
    #[error("Unsupported transaction type: {0}")]
    Unsupported(String),
}

impl TransactionError {
    /// The gradebook error wrapped by this error, if any.
    pub fn as_gradebook(&self) -> Option<&GradeBookError> {
        match self {
            Self::GradeBook(e) => Some(e),
            _ => None,
        }
    }
}

impl ErrorCode for TransactionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "TX_SERIALIZATION_ERROR",
            Self::Deserialization(_) => "TX_DESERIALIZATION_ERROR",
            Self::InvalidInput(_) => "TX_INVALID_INPUT",
            Self::GradeBook(e) => e.code(),
            Self::State(e) => e.code(),
            Self::Unsupported(_) => "TX_UNSUPPORTED",
        }
    }
}
