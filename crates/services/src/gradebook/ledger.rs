// Path: crates/services/src/gradebook/ledger.rs

use super::allocator::IdentifierAllocator;
use super::recorders::RecorderRegistry;
use super::students::StudentRegistry;
use gradebook_api::state::{read_u64, write_u64, StateAccess};
use gradebook_api::transaction::context::TxContext;
use gradebook_types::app::{
    EvaluationDetails, EvaluationId, EvaluationRecord, IdNamespace, LedgerEvent,
    RecorderEvaluation, RecorderId, ScoreInput, Scores, StudentEvaluation, StudentId,
    StudentText,
};
use gradebook_types::codec;
use gradebook_types::error::{GradeBookError, StateError, TransactionError};
use gradebook_types::keys::{
    by_recorder_len_key, by_recorder_slot_key, by_student_len_key, by_student_slot_key,
    evaluation_entry_key,
};

/// The append-only evaluation log and its two secondary indexes.
///
/// # Append Invariant
///
/// Every append writes the entry at `evaluations::entry::{id}` and pushes `id` onto
/// both `by_recorder[recorder_id]` and `by_student[student_id]`. The three writes
/// land in the same overlay, so they commit together or not at all. Every check
/// that can fail runs before the first write.
pub struct EvaluationLedger;

impl EvaluationLedger {
    /// Appends an evaluation for an already registered student, attributed to the
    /// caller in `ctx`. The caller's recorder ID is provisioned on first use.
    pub fn record<S: StateAccess + ?Sized>(
        state: &mut S,
        ctx: &mut TxContext,
        student_id: StudentId,
        activity_id: u64,
        scores: &ScoreInput,
    ) -> Result<EvaluationId, TransactionError> {
        let scores = scores.validate()?;
        StudentRegistry::validate(state, student_id)?;
        let recorder_id = RecorderRegistry::get_or_create(state, &ctx.signer_account_id)?;
        Self::append(state, ctx, recorder_id, student_id, activity_id, scores)
    }

    /// Like [`EvaluationLedger::record`], but registers the student on first sight of
    /// `text` and reuses the existing ID afterwards.
    pub fn record_for_student_text<S: StateAccess + ?Sized>(
        state: &mut S,
        ctx: &mut TxContext,
        text: &StudentText,
        activity_id: u64,
        scores: &ScoreInput,
    ) -> Result<EvaluationId, TransactionError> {
        let scores = scores.validate()?;
        let mut student_id = StudentRegistry::lookup_id(state, text)?;
        if student_id.is_none() {
            student_id = StudentRegistry::create(state, text)?;
        }
        let recorder_id = RecorderRegistry::get_or_create(state, &ctx.signer_account_id)?;
        Self::append(state, ctx, recorder_id, student_id, activity_id, scores)
    }

    fn append<S: StateAccess + ?Sized>(
        state: &mut S,
        ctx: &mut TxContext,
        recorder_id: RecorderId,
        student_id: StudentId,
        activity_id: u64,
        scores: Scores,
    ) -> Result<EvaluationId, TransactionError> {
        // The allocator is 1-based; the log is 0-based.
        let evaluation_id =
            EvaluationId(IdentifierAllocator::next(state, IdNamespace::Evaluations)? - 1);
        let record = EvaluationRecord {
            recorder_id,
            student_id,
            activity_id,
            scores,
        };
        state.insert(
            &evaluation_entry_key(evaluation_id),
            &codec::to_bytes_canonical(&record).map_err(TransactionError::Serialization)?,
        )?;
        push_index(
            state,
            &by_recorder_len_key(recorder_id),
            |i| by_recorder_slot_key(recorder_id, i),
            evaluation_id,
        )?;
        push_index(
            state,
            &by_student_len_key(student_id),
            |i| by_student_slot_key(student_id, i),
            evaluation_id,
        )?;

        ctx.emit(LedgerEvent::EvaluationRecorded {
            evaluation_id,
            student_id,
            activity_id,
            recorder_id,
        });
        log::info!(
            "[GradeBook] Evaluation {} recorded: student {}, activity {}, recorder {}",
            evaluation_id,
            student_id,
            activity_id,
            recorder_id
        );
        Ok(evaluation_id)
    }

    /// The total number of evaluations in the log.
    pub fn count<S: StateAccess + ?Sized>(state: &S) -> Result<u64, StateError> {
        IdentifierAllocator::current(state, IdNamespace::Evaluations)
    }

    pub fn count_by_recorder<S: StateAccess + ?Sized>(
        state: &S,
        recorder_id: RecorderId,
    ) -> Result<u64, TransactionError> {
        RecorderRegistry::validate(state, recorder_id)?;
        Ok(read_u64(state, &by_recorder_len_key(recorder_id))?)
    }

    /// The number of evaluations of a student; 0 for an unknown student.
    pub fn count_by_student<S: StateAccess + ?Sized>(
        state: &S,
        student_id: StudentId,
    ) -> Result<u64, StateError> {
        read_u64(state, &by_student_len_key(student_id))
    }

    pub fn get<S: StateAccess + ?Sized>(
        state: &S,
        evaluation_id: EvaluationId,
    ) -> Result<EvaluationDetails, TransactionError> {
        check_index(evaluation_id.0, Self::count(state)?)?;
        let record = load_record(state, evaluation_id)?;
        Ok(EvaluationDetails {
            evaluation_id,
            recorder_id: record.recorder_id,
            recorder: RecorderRegistry::lookup_address(state, record.recorder_id)?,
            student_id: record.student_id,
            student_text: StudentRegistry::lookup_text(state, record.student_id)?,
            activity_id: record.activity_id,
            scores: record.scores,
        })
    }

    /// The `index`-th evaluation submitted by `recorder_id`, in append order.
    pub fn get_by_recorder<S: StateAccess + ?Sized>(
        state: &S,
        recorder_id: RecorderId,
        index: u64,
    ) -> Result<RecorderEvaluation, TransactionError> {
        let len = Self::count_by_recorder(state, recorder_id)?;
        check_index(index, len)?;
        let evaluation_id = read_slot(state, &by_recorder_slot_key(recorder_id, index))?;
        let record = load_record(state, evaluation_id)?;
        Ok(RecorderEvaluation {
            evaluation_id,
            student_id: record.student_id,
            student_text: StudentRegistry::lookup_text(state, record.student_id)?,
            activity_id: record.activity_id,
            scores: record.scores,
        })
    }

    /// The `index`-th evaluation of `student_id`, in append order.
    pub fn get_by_student<S: StateAccess + ?Sized>(
        state: &S,
        student_id: StudentId,
        index: u64,
    ) -> Result<StudentEvaluation, TransactionError> {
        StudentRegistry::validate(state, student_id)?;
        check_index(index, Self::count_by_student(state, student_id)?)?;
        let evaluation_id = read_slot(state, &by_student_slot_key(student_id, index))?;
        let record = load_record(state, evaluation_id)?;
        Ok(StudentEvaluation {
            evaluation_id,
            recorder_id: record.recorder_id,
            recorder: RecorderRegistry::lookup_address(state, record.recorder_id)?,
            activity_id: record.activity_id,
            scores: record.scores,
        })
    }
}

fn check_index(index: u64, len: u64) -> Result<(), GradeBookError> {
    if index >= len {
        return Err(GradeBookError::InvalidEvaluationIndex { index, len });
    }
    Ok(())
}

fn push_index<S: StateAccess + ?Sized>(
    state: &mut S,
    len_key: &[u8],
    slot_key: impl Fn(u64) -> Vec<u8>,
    evaluation_id: EvaluationId,
) -> Result<(), StateError> {
    let len = read_u64(state, len_key)?;
    write_u64(state, &slot_key(len), evaluation_id.0)?;
    write_u64(state, len_key, len + 1)
}

fn read_slot<S: StateAccess + ?Sized>(state: &S, key: &[u8]) -> Result<EvaluationId, StateError> {
    if state.get(key)?.is_none() {
        return Err(StateError::Backend(format!(
            "index slot '{}' is within bounds but missing",
            String::from_utf8_lossy(key)
        )));
    }
    read_u64(state, key).map(EvaluationId)
}

fn load_record<S: StateAccess + ?Sized>(
    state: &S,
    evaluation_id: EvaluationId,
) -> Result<EvaluationRecord, StateError> {
    let bytes = state
        .get(&evaluation_entry_key(evaluation_id))?
        .ok_or_else(|| {
            StateError::Backend(format!("evaluation {} is counted but missing", evaluation_id))
        })?;
    codec::from_bytes_canonical(&bytes).map_err(StateError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_storage::MemoryStore;
    use gradebook_test_utils::fixtures::{sample_scores, scores, signer, student_text};
    use gradebook_test_utils::strategies::{arb_invalid_scores, arb_valid_scores};
    use gradebook_test_utils::{assert_gradebook_err, assert_ok};
    use gradebook_types::app::{AccountId, Score, ScoreField};
    use proptest::prelude::*;

    fn ctx(account: AccountId) -> TxContext {
        TxContext::new(1, account)
    }

    fn with_student(text: &str) -> (MemoryStore, StudentId) {
        let mut state = MemoryStore::new();
        let id = StudentRegistry::create(&mut state, &student_text(text)).unwrap();
        (state, id)
    }

    #[test]
    fn first_evaluation_scenario() {
        let (mut state, student) = with_student("abc123");
        assert_eq!(student, StudentId(1));

        let mut ctx = ctx(signer(0xAA));
        let id = assert_ok!(EvaluationLedger::record(
            &mut state,
            &mut ctx,
            student,
            7,
            &sample_scores()
        ));
        assert_eq!(id, EvaluationId(0));

        let details = EvaluationLedger::get(&state, id).unwrap();
        assert_eq!(details.recorder_id, RecorderId(1));
        assert_eq!(details.recorder, signer(0xAA));
        assert_eq!(details.student_id, StudentId(1));
        assert_eq!(details.student_text, student_text("abc123"));
        assert_eq!(details.activity_id, 7);
        assert_eq!(
            details.scores.as_array(),
            [Score(3), Score(4), Score(5), Score(6), Score(7)]
        );

        assert_eq!(EvaluationLedger::count(&state).unwrap(), 1);
        assert_eq!(EvaluationLedger::count_by_student(&state, student).unwrap(), 1);
        assert_eq!(
            EvaluationLedger::count_by_recorder(&state, RecorderId(1)).unwrap(),
            1
        );
        assert_eq!(
            ctx.events,
            vec![LedgerEvent::EvaluationRecorded {
                evaluation_id: EvaluationId(0),
                student_id: StudentId(1),
                activity_id: 7,
                recorder_id: RecorderId(1),
            }]
        );
    }

    #[test]
    fn unknown_student_fails_before_any_write() {
        let mut state = MemoryStore::new();
        let mut ctx = ctx(signer(1));
        assert_gradebook_err!(
            EvaluationLedger::record(&mut state, &mut ctx, StudentId(999), 1, &sample_scores()),
            GradeBookError::InvalidStudentId(999)
        );
        assert_eq!(EvaluationLedger::count(&state).unwrap(), 0);
        assert!(state.is_empty());
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn student_zero_is_never_valid() {
        let (mut state, _) = with_student("someone");
        assert_gradebook_err!(
            EvaluationLedger::record(&mut state, &mut ctx(signer(1)), StudentId::NONE, 1, &sample_scores()),
            GradeBookError::InvalidStudentId(0)
        );
    }

    #[test]
    fn score_of_256_is_rejected_not_truncated() {
        let (mut state, student) = with_student("abc123");
        let keys_before = state.len();
        assert_gradebook_err!(
            EvaluationLedger::record(
                &mut state,
                &mut ctx(signer(1)),
                student,
                1,
                &scores([3, 4, 5, 256, 7])
            ),
            GradeBookError::ScoreOutOfRange {
                field: ScoreField::Points,
                value: 256
            }
        );
        assert_eq!(EvaluationLedger::count(&state).unwrap(), 0);
        assert_eq!(state.len(), keys_before);
        assert_eq!(RecorderRegistry::count(&state).unwrap(), 0);
    }

    #[test]
    fn record_for_student_text_reuses_student() {
        let mut state = MemoryStore::new();
        let mut ctx = ctx(signer(3));
        let text = student_text("repeat");

        let first =
            EvaluationLedger::record_for_student_text(&mut state, &mut ctx, &text, 1, &sample_scores())
                .unwrap();
        let second =
            EvaluationLedger::record_for_student_text(&mut state, &mut ctx, &text, 2, &sample_scores())
                .unwrap();
        assert_eq!((first, second), (EvaluationId(0), EvaluationId(1)));
        assert_eq!(StudentRegistry::count(&state).unwrap(), 1);

        let student = StudentRegistry::lookup_id(&state, &text).unwrap();
        assert_eq!(EvaluationLedger::count_by_student(&state, student).unwrap(), 2);
        assert_eq!(
            EvaluationLedger::get_by_student(&state, student, 1).unwrap().activity_id,
            2
        );
    }

    #[test]
    fn secondary_indexes_keep_append_order() {
        let mut state = MemoryStore::new();
        let a = StudentRegistry::create(&mut state, &student_text("a")).unwrap();
        let b = StudentRegistry::create(&mut state, &student_text("b")).unwrap();

        // recorder 1 grades a, b, a; recorder 2 grades b.
        let plan = [(1u8, a, 10u64), (1, b, 11), (2, b, 12), (1, a, 13)];
        for (who, student, activity) in plan {
            EvaluationLedger::record(&mut state, &mut ctx(signer(who)), student, activity, &sample_scores())
                .unwrap();
        }

        let r1 = RecorderRegistry::lookup_id(&state, &signer(1)).unwrap();
        let activities: Vec<u64> = (0..EvaluationLedger::count_by_recorder(&state, r1).unwrap())
            .map(|i| EvaluationLedger::get_by_recorder(&state, r1, i).unwrap().activity_id)
            .collect();
        assert_eq!(activities, vec![10, 11, 13]);

        let by_b: Vec<EvaluationId> = (0..EvaluationLedger::count_by_student(&state, b).unwrap())
            .map(|i| EvaluationLedger::get_by_student(&state, b, i).unwrap().evaluation_id)
            .collect();
        assert_eq!(by_b, vec![EvaluationId(1), EvaluationId(2)]);

        let view = EvaluationLedger::get_by_recorder(&state, r1, 1).unwrap();
        assert_eq!(view.student_text, student_text("b"));
        let view = EvaluationLedger::get_by_student(&state, b, 1).unwrap();
        assert_eq!(view.recorder, signer(2));
    }

    #[test]
    fn out_of_bounds_reads_fail() {
        let (mut state, student) = with_student("abc123");
        EvaluationLedger::record(&mut state, &mut ctx(signer(1)), student, 7, &sample_scores()).unwrap();

        assert_gradebook_err!(
            EvaluationLedger::get(&state, EvaluationId(1)),
            GradeBookError::InvalidEvaluationIndex { index: 1, len: 1 }
        );
        assert_gradebook_err!(
            EvaluationLedger::get_by_recorder(&state, RecorderId(1), 1),
            GradeBookError::InvalidEvaluationIndex { index: 1, len: 1 }
        );
        assert_gradebook_err!(
            EvaluationLedger::get_by_recorder(&state, RecorderId(2), 0),
            GradeBookError::InvalidRecorderId(2)
        );
        assert_gradebook_err!(
            EvaluationLedger::get_by_student(&state, StudentId(5), 0),
            GradeBookError::InvalidStudentId(5)
        );
        assert_gradebook_err!(
            EvaluationLedger::count_by_recorder(&state, RecorderId::NONE),
            GradeBookError::InvalidRecorderId(0)
        );
        assert_eq!(EvaluationLedger::count_by_student(&state, StudentId(5)).unwrap(), 0);
    }

    proptest! {
        #[test]
        fn every_append_grows_all_three_views_by_one(
            writes in proptest::collection::vec((0u8..3, 0usize..3, any::<u64>(), arb_valid_scores()), 1..20)
        ) {
            let mut state = MemoryStore::new();
            let students: Vec<StudentId> = ["s0", "s1", "s2"]
                .iter()
                .map(|t| StudentRegistry::create(&mut state, &student_text(t)).unwrap())
                .collect();

            for (who, student_idx, activity, input) in writes {
                let student = students[student_idx];
                let mut ctx = ctx(signer(who));
                let recorder = RecorderRegistry::get_or_create(&mut state, &ctx.signer_account_id).unwrap();

                let total = EvaluationLedger::count(&state).unwrap();
                let by_recorder = EvaluationLedger::count_by_recorder(&state, recorder).unwrap();
                let by_student = EvaluationLedger::count_by_student(&state, student).unwrap();

                let id = EvaluationLedger::record(&mut state, &mut ctx, student, activity, &input).unwrap();
                prop_assert_eq!(id, EvaluationId(total));
                prop_assert_eq!(EvaluationLedger::count(&state).unwrap(), total + 1);
                prop_assert_eq!(EvaluationLedger::count_by_recorder(&state, recorder).unwrap(), by_recorder + 1);
                prop_assert_eq!(EvaluationLedger::count_by_student(&state, student).unwrap(), by_student + 1);

                let details = EvaluationLedger::get(&state, id).unwrap();
                prop_assert_eq!(details.recorder_id, recorder);
                prop_assert_eq!(details.student_id, student);
                prop_assert_eq!(details.activity_id, activity);
                prop_assert_eq!(ScoreInput::from(details.scores), input);
                prop_assert_eq!(
                    EvaluationLedger::get_by_recorder(&state, recorder, by_recorder).unwrap().evaluation_id,
                    id
                );
                prop_assert_eq!(
                    EvaluationLedger::get_by_student(&state, student, by_student).unwrap().evaluation_id,
                    id
                );
            }
        }

        #[test]
        fn out_of_range_scores_never_append(input in arb_invalid_scores()) {
            let (mut state, student) = with_student("abc123");
            let keys_before = state.len();
            let err = EvaluationLedger::record(&mut state, &mut ctx(signer(1)), student, 1, &input).unwrap_err();
            let is_range_error = matches!(err.as_gradebook(), Some(GradeBookError::ScoreOutOfRange { .. }));
            prop_assert!(is_range_error);
            prop_assert_eq!(state.len(), keys_before);
        }
    }
}
