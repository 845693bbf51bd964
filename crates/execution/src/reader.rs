// Path: crates/execution/src/reader.rs
use crate::machine::LedgerState;
use gradebook_api::state::ReadOnlyNamespacedStateAccess;
use gradebook_services::gradebook::{EvaluationLedger, RecorderRegistry, StudentRegistry};
use gradebook_types::app::{
    AccountId, EvaluationDetails, EvaluationId, RecorderEvaluation, RecorderId,
    StudentEvaluation, StudentId, StudentText,
};
use gradebook_types::error::TransactionError;
use std::sync::RwLockReadGuard;

/// A consistent, read-only snapshot of the ledger.
///
/// Holds the shared lock, so every query made through one reader sees the same
/// committed state. Queries go through a `ReadOnlyNamespacedStateAccess`, so none
/// of them can write.
pub struct LedgerReader<'a> {
    guard: RwLockReadGuard<'a, LedgerState>,
    prefix: Vec<u8>,
}

impl<'a> LedgerReader<'a> {
    pub(crate) fn new(guard: RwLockReadGuard<'a, LedgerState>, prefix: Vec<u8>) -> Self {
        Self { guard, prefix }
    }

    fn view(&self) -> ReadOnlyNamespacedStateAccess<'_> {
        ReadOnlyNamespacedStateAccess::new(&self.guard.store, self.prefix.clone())
    }

    /// The sequence of the last committed write.
    pub fn sequence(&self) -> u64 {
        self.guard.sequence
    }

    /// Returns `StudentId::NONE` if `text` is unbound.
    pub fn student_id(&self, text: &StudentText) -> Result<StudentId, TransactionError> {
        Ok(StudentRegistry::lookup_id(&self.view(), text)?)
    }

    pub fn student_text(&self, id: StudentId) -> Result<StudentText, TransactionError> {
        StudentRegistry::lookup_text(&self.view(), id)
    }

    pub fn student_count(&self) -> Result<u64, TransactionError> {
        Ok(StudentRegistry::count(&self.view())?)
    }

    /// Returns `RecorderId::NONE` if `account` never wrote.
    pub fn recorder_id(&self, account: &AccountId) -> Result<RecorderId, TransactionError> {
        Ok(RecorderRegistry::lookup_id(&self.view(), account)?)
    }

    pub fn recorder_address(&self, id: RecorderId) -> Result<AccountId, TransactionError> {
        RecorderRegistry::lookup_address(&self.view(), id)
    }

    pub fn recorder_count(&self) -> Result<u64, TransactionError> {
        Ok(RecorderRegistry::count(&self.view())?)
    }

    pub fn evaluation(&self, id: EvaluationId) -> Result<EvaluationDetails, TransactionError> {
        EvaluationLedger::get(&self.view(), id)
    }

    pub fn evaluation_by_recorder(
        &self,
        recorder_id: RecorderId,
        index: u64,
    ) -> Result<RecorderEvaluation, TransactionError> {
        EvaluationLedger::get_by_recorder(&self.view(), recorder_id, index)
    }

    pub fn evaluation_by_student(
        &self,
        student_id: StudentId,
        index: u64,
    ) -> Result<StudentEvaluation, TransactionError> {
        EvaluationLedger::get_by_student(&self.view(), student_id, index)
    }

    pub fn evaluation_count(&self) -> Result<u64, TransactionError> {
        Ok(EvaluationLedger::count(&self.view())?)
    }

    pub fn evaluation_count_by_recorder(
        &self,
        recorder_id: RecorderId,
    ) -> Result<u64, TransactionError> {
        EvaluationLedger::count_by_recorder(&self.view(), recorder_id)
    }

    /// 0 for a student with no evaluations, including an unknown one.
    pub fn evaluation_count_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<u64, TransactionError> {
        Ok(EvaluationLedger::count_by_student(&self.view(), student_id)?)
    }
}
