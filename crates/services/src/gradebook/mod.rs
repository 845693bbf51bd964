// Path: crates/services/src/gradebook/mod.rs
//! The gradebook service: identifier registries and the evaluation ledger.

mod allocator;
mod ledger;
mod recorders;
mod students;

pub use allocator::IdentifierAllocator;
pub use ledger::EvaluationLedger;
pub use recorders::RecorderRegistry;
pub use students::StudentRegistry;

use gradebook_api::services::LedgerService;
use gradebook_api::state::StateAccess;
use gradebook_api::transaction::context::TxContext;
use gradebook_types::app::{ScoreInput, StudentId, StudentText};
use gradebook_types::codec;
use gradebook_types::error::TransactionError;
use gradebook_types::keys::GRADEBOOK_SERVICE_ID;
use parity_scale_codec::{Decode, Encode};

// --- Service Method Parameter Structs (The Service's Public ABI) ---

#[derive(Encode, Decode, Debug, Clone)]
pub struct MakeStudentIdParams {
    pub text: StudentText,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct RecordEvaluationParams {
    pub student_id: StudentId,
    pub activity_id: u64,
    pub scores: ScoreInput,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct RecordEvaluationForStudentTextParams {
    pub text: StudentText,
    pub activity_id: u64,
    pub scores: ScoreInput,
}

/// Exposes the write entry points of the gradebook through method dispatch.
///
/// Reads do not go through dispatch; they call the registries and the ledger
/// directly against a read-only view of the state.
#[derive(Debug, Clone, Default)]
pub struct GradeBookService;

impl GradeBookService {
    pub const MAKE_STUDENT_ID: &'static str = "make_student_id@v1";
    pub const RECORD_EVALUATION: &'static str = "record_evaluation@v1";
    pub const RECORD_EVALUATION_FOR_STUDENT_TEXT: &'static str =
        "record_evaluation_for_student_text@v1";
}

impl LedgerService for GradeBookService {
    fn id(&self) -> &str {
        GRADEBOOK_SERVICE_ID
    }

    fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        match method {
            Self::MAKE_STUDENT_ID => {
                let p: MakeStudentIdParams =
                    codec::from_bytes_canonical(params).map_err(TransactionError::Deserialization)?;
                StudentRegistry::create(state, &p.text)?;
                Ok(())
            }

            Self::RECORD_EVALUATION => {
                let p: RecordEvaluationParams =
                    codec::from_bytes_canonical(params).map_err(TransactionError::Deserialization)?;
                EvaluationLedger::record(state, ctx, p.student_id, p.activity_id, &p.scores)?;
                Ok(())
            }

            Self::RECORD_EVALUATION_FOR_STUDENT_TEXT => {
                let p: RecordEvaluationForStudentTextParams =
                    codec::from_bytes_canonical(params).map_err(TransactionError::Deserialization)?;
                EvaluationLedger::record_for_student_text(
                    state,
                    ctx,
                    &p.text,
                    p.activity_id,
                    &p.scores,
                )?;
                Ok(())
            }

            _ => Err(TransactionError::Unsupported(format!(
                "GradeBook does not support method '{}'",
                method
            ))),
        }
    }
}
