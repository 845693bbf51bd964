// Path: crates/services/src/gradebook/recorders.rs

use super::allocator::IdentifierAllocator;
use gradebook_api::state::{read_u64, write_u64, StateAccess};
use gradebook_types::app::{AccountId, IdNamespace, RecorderId};
use gradebook_types::codec;
use gradebook_types::error::{GradeBookError, StateError, TransactionError};
use gradebook_types::keys::{recorder_by_account_key, recorder_by_id_key};

/// The bidirectional identity <-> ID map of recorders.
///
/// Unlike students, recorders are provisioned implicitly the first time an identity
/// writes, and asking again for the same identity returns the same ID.
pub struct RecorderRegistry;

impl RecorderRegistry {
    pub fn get_or_create<S: StateAccess + ?Sized>(
        state: &mut S,
        account: &AccountId,
    ) -> Result<RecorderId, TransactionError> {
        let existing = Self::lookup_id(state, account)?;
        if !existing.is_none() {
            return Ok(existing);
        }

        let id = RecorderId(IdentifierAllocator::next(state, IdNamespace::Recorders)?);
        write_u64(state, &recorder_by_account_key(account), id.0)?;
        state.insert(
            &recorder_by_id_key(id),
            &codec::to_bytes_canonical(account).map_err(TransactionError::Serialization)?,
        )?;
        log::info!("[GradeBook] Provisioned recorder {} for {}", id, account);
        Ok(id)
    }

    /// Returns the ID bound to `account`, or `RecorderId::NONE` if it never wrote.
    pub fn lookup_id<S: StateAccess + ?Sized>(
        state: &S,
        account: &AccountId,
    ) -> Result<RecorderId, StateError> {
        read_u64(state, &recorder_by_account_key(account)).map(RecorderId)
    }

    pub fn lookup_address<S: StateAccess + ?Sized>(
        state: &S,
        id: RecorderId,
    ) -> Result<AccountId, TransactionError> {
        Self::validate(state, id)?;
        let bytes = state.get(&recorder_by_id_key(id))?.ok_or_else(|| {
            StateError::Backend(format!("recorder {} is allocated but has no identity", id))
        })?;
        Ok(codec::from_bytes_canonical(&bytes).map_err(StateError::Decode)?)
    }

    pub fn count<S: StateAccess + ?Sized>(state: &S) -> Result<u64, StateError> {
        IdentifierAllocator::current(state, IdNamespace::Recorders)
    }

    /// Fails with `InvalidRecorderId` unless `id` was allocated.
    pub fn validate<S: StateAccess + ?Sized>(
        state: &S,
        id: RecorderId,
    ) -> Result<(), TransactionError> {
        if id.is_none() || id.0 > Self::count(state)? {
            return Err(GradeBookError::InvalidRecorderId(id.0).into());
        }
        Ok(())
    }
}
