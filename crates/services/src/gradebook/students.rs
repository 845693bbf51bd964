// Path: crates/services/src/gradebook/students.rs

use super::allocator::IdentifierAllocator;
use gradebook_api::state::{read_u64, write_u64, StateAccess};
use gradebook_types::app::{IdNamespace, StudentId, StudentText};
use gradebook_types::codec;
use gradebook_types::error::{GradeBookError, StateError, TransactionError};
use gradebook_types::keys::{student_by_id_key, student_by_text_key};

/// The bidirectional text <-> ID map of registered students.
///
/// Registration is strict: binding a text that is already bound fails with
/// `DuplicateStudent` instead of returning the existing ID. Callers that want
/// idempotent registration look the text up first.
pub struct StudentRegistry;

impl StudentRegistry {
    pub fn create<S: StateAccess + ?Sized>(
        state: &mut S,
        text: &StudentText,
    ) -> Result<StudentId, TransactionError> {
        let text_key = student_by_text_key(text);
        if state.get(&text_key)?.is_some() {
            return Err(GradeBookError::DuplicateStudent(*text).into());
        }

        let id = StudentId(IdentifierAllocator::next(state, IdNamespace::Students)?);
        write_u64(state, &text_key, id.0)?;
        state.insert(
            &student_by_id_key(id),
            &codec::to_bytes_canonical(text).map_err(TransactionError::Serialization)?,
        )?;
        log::debug!("[GradeBook] Registered student '{}' as {}", text, id);
        Ok(id)
    }

    /// Returns the ID bound to `text`, or `StudentId::NONE` if it is unbound.
    pub fn lookup_id<S: StateAccess + ?Sized>(
        state: &S,
        text: &StudentText,
    ) -> Result<StudentId, StateError> {
        read_u64(state, &student_by_text_key(text)).map(StudentId)
    }

    pub fn lookup_text<S: StateAccess + ?Sized>(
        state: &S,
        id: StudentId,
    ) -> Result<StudentText, TransactionError> {
        Self::validate(state, id)?;
        let bytes = state.get(&student_by_id_key(id))?.ok_or_else(|| {
            StateError::Backend(format!("student {} is allocated but has no text", id))
        })?;
        Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::Decode)?)
    }

    /// The number of students ever registered.
    pub fn count<S: StateAccess + ?Sized>(state: &S) -> Result<u64, StateError> {
        IdentifierAllocator::current(state, IdNamespace::Students)
    }

    /// Fails with `InvalidStudentId` unless `id` was allocated.
    pub fn validate<S: StateAccess + ?Sized>(
        state: &S,
        id: StudentId,
    ) -> Result<(), TransactionError> {
        if id.is_none() || id.0 > Self::count(state)? {
            return Err(GradeBookError::InvalidStudentId(id.0).into());
        }
        Ok(())
    }
}
