// Path: crates/types/src/app/events.rs

use crate::app::{EvaluationId, RecorderId, StudentId};
use parity_scale_codec::{Decode, Encode};
use serde::Serialize;

/// A notification describing a committed change to the ledger.
///
/// Events are published to external observers after the write that produced them
/// has been committed. The ledger never reads them back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Encode, Decode)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// An evaluation was appended to the log.
    EvaluationRecorded {
        /// Position of the new evaluation in the global log.
        evaluation_id: EvaluationId,
        /// The evaluated student.
        student_id: StudentId,
        /// The graded activity.
        activity_id: u64,
        /// The recorder that submitted it.
        recorder_id: RecorderId,
    },
}
