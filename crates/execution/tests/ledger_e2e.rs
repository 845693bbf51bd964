// Path: crates/execution/tests/ledger_e2e.rs
//! End-to-end scenarios against a `LedgerMachine`, in memory and on disk.

use gradebook_execution::LedgerMachine;
use gradebook_services::gradebook::{
    MakeStudentIdParams, RecordEvaluationForStudentTextParams, RecordEvaluationParams,
};
use gradebook_services::GradeBookService;
use gradebook_storage::WalWriter;
use gradebook_test_utils::fixtures::{import_rows, sample_scores, scores, signer, student_text};
use gradebook_test_utils::{assert_err, assert_gradebook_err, assert_ok};
use gradebook_types::app::{
    EvaluationId, LedgerEvent, RecorderId, Score, ScoreField, ScoreInput, StudentId,
};
use gradebook_types::codec;
use gradebook_types::config::LedgerConfig;
use gradebook_types::error::{ErrorCode, GradeBookError};
use std::fs::OpenOptions;
use std::sync::Arc;
use tempfile::tempdir;
use tokio::sync::broadcast;

fn disk_config(dir: &std::path::Path) -> LedgerConfig {
    LedgerConfig {
        data_dir: dir.to_path_buf(),
        ..LedgerConfig::default()
    }
}

#[test]
fn first_evaluation_is_visible_through_all_three_views() {
    let ledger = LedgerMachine::in_memory();
    let student = assert_ok!(ledger.make_student_id(signer(0xA0), &student_text("abc123")));
    assert_eq!(student, StudentId(1));

    let id = assert_ok!(ledger.record_evaluation(signer(0xB1), student, 7, &sample_scores()));
    assert_eq!(id, EvaluationId(0));

    let reader = ledger.reader().unwrap();
    let details = reader.evaluation(id).unwrap();
    assert_eq!(details.recorder_id, RecorderId(1));
    assert_eq!(details.recorder, signer(0xB1));
    assert_eq!(details.student_id, StudentId(1));
    assert_eq!(details.activity_id, 7);
    assert_eq!(
        details.scores.as_array(),
        [Score(3), Score(4), Score(5), Score(6), Score(7)]
    );
    assert_eq!(reader.evaluation_count().unwrap(), 1);
    assert_eq!(reader.evaluation_count_by_student(StudentId(1)).unwrap(), 1);
    assert_eq!(reader.evaluation_count_by_recorder(RecorderId(1)).unwrap(), 1);
    assert_eq!(reader.recorder_count().unwrap(), 1);
    assert_eq!(reader.recorder_id(&signer(0xB1)).unwrap(), RecorderId(1));
    assert!(reader.recorder_id(&signer(0xA0)).unwrap().is_none());
}

#[test]
fn rejected_writes_change_nothing() {
    let ledger = LedgerMachine::in_memory();
    assert_gradebook_err!(
        ledger.record_evaluation(signer(1), StudentId(999), 1, &sample_scores()),
        GradeBookError::InvalidStudentId(999)
    );

    ledger.make_student_id(signer(1), &student_text("abc123")).unwrap();
    assert_gradebook_err!(
        ledger.record_evaluation(signer(1), StudentId(1), 1, &scores([3, 4, 5, 6, 256])),
        GradeBookError::ScoreOutOfRange {
            field: ScoreField::WeightedPoints,
            value: 256
        }
    );

    let reader = ledger.reader().unwrap();
    assert_eq!(reader.evaluation_count().unwrap(), 0);
    assert_eq!(reader.recorder_count().unwrap(), 0);
    assert_eq!(reader.sequence(), 1);
}

#[test]
fn rejected_write_for_new_text_registers_no_student() {
    let ledger = LedgerMachine::in_memory();
    assert_gradebook_err!(
        ledger.record_evaluation_for_student_text(
            signer(1),
            &student_text("newcomer"),
            1,
            &scores([3, 4, 5, 6, -1]),
        ),
        GradeBookError::ScoreOutOfRange {
            field: ScoreField::WeightedPoints,
            value: -1
        }
    );

    let reader = ledger.reader().unwrap();
    assert_eq!(reader.student_count().unwrap(), 0);
    assert!(reader.student_id(&student_text("newcomer")).unwrap().is_none());
    assert_eq!(reader.recorder_count().unwrap(), 0);
    assert_eq!(reader.sequence(), 0);
}

#[test]
fn events_are_published_only_after_commit() {
    let (tx, mut rx) = broadcast::channel(16);
    let ledger = LedgerMachine::in_memory().with_event_sender(tx);

    ledger.make_student_id(signer(1), &student_text("abc123")).unwrap();
    assert!(rx.try_recv().is_err(), "registering a student emits nothing");

    ledger.record_evaluation(signer(1), StudentId(1), 7, &sample_scores()).unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        LedgerEvent::EvaluationRecorded {
            evaluation_id: EvaluationId(0),
            student_id: StudentId(1),
            activity_id: 7,
            recorder_id: RecorderId(1),
        }
    );

    let _ = ledger.record_evaluation(signer(1), StudentId(2), 7, &sample_scores());
    assert!(rx.try_recv().is_err(), "failed writes publish nothing");
}

#[test]
fn writes_succeed_without_any_subscriber() {
    let (tx, rx) = broadcast::channel(1);
    drop(rx);
    let ledger = LedgerMachine::in_memory().with_event_sender(tx);
    ledger
        .record_evaluation_for_student_text(signer(1), &student_text("solo"), 1, &sample_scores())
        .unwrap();
    assert_eq!(ledger.reader().unwrap().evaluation_count().unwrap(), 1);
}

#[test]
fn state_survives_reopen() {
    let dir = tempdir().unwrap();
    let config = disk_config(dir.path());
    {
        let ledger = LedgerMachine::open(&config).unwrap();
        for (text, activity, decimals) in import_rows() {
            ledger
                .record_evaluation_for_student_text(
                    signer(4),
                    &student_text(text),
                    activity,
                    &ScoreInput::from_decimals(decimals),
                )
                .unwrap();
        }
    }

    let ledger = LedgerMachine::open(&config).unwrap();
    let reader = ledger.reader().unwrap();
    assert_eq!(reader.sequence(), 3);
    assert_eq!(reader.student_count().unwrap(), 2);
    assert_eq!(reader.evaluation_count().unwrap(), 3);

    let abc = reader.student_id(&student_text("abc123")).unwrap();
    assert_eq!(reader.evaluation_count_by_student(abc).unwrap(), 2);
    let second = reader.evaluation_by_student(abc, 1).unwrap();
    assert_eq!(second.activity_id, 2);
    assert_eq!(second.scores.points, Score(61));
    assert_eq!(second.recorder, signer(4));
    drop(reader);

    // The reopened ledger keeps appending after the replayed commits.
    let id = ledger.record_evaluation(signer(5), abc, 9, &sample_scores()).unwrap();
    assert_eq!(id, EvaluationId(3));
    assert_eq!(ledger.reader().unwrap().sequence(), 4);
}

#[test]
fn torn_tail_is_dropped_on_open() {
    let dir = tempdir().unwrap();
    let config = disk_config(dir.path());
    {
        let ledger = LedgerMachine::open(&config).unwrap();
        ledger.make_student_id(signer(1), &student_text("kept")).unwrap();
        ledger.make_student_id(signer(1), &student_text("torn")).unwrap();
    }
    let wal = config.wal_path();
    let len = std::fs::metadata(&wal).unwrap().len();
    OpenOptions::new()
        .write(true)
        .open(&wal)
        .unwrap()
        .set_len(len - 1)
        .unwrap();

    let ledger = LedgerMachine::open(&config).unwrap();
    let reader = ledger.reader().unwrap();
    assert_eq!(reader.sequence(), 1);
    assert_eq!(reader.student_id(&student_text("kept")).unwrap(), StudentId(1));
    assert!(reader.student_id(&student_text("torn")).unwrap().is_none());
}

#[test]
fn out_of_order_wal_refuses_to_open() {
    let dir = tempdir().unwrap();
    let config = disk_config(dir.path());
    let writer = WalWriter::open(&config.wal_path(), true).unwrap();
    writer.append_commit(1, &[]).unwrap();
    writer.append_commit(3, &[]).unwrap();
    drop(writer);

    let err = LedgerMachine::open(&config).unwrap_err();
    assert!(err.to_string().contains("out of order"), "{}", err);
}

#[test]
fn submit_dispatches_encoded_calls() {
    let ledger = LedgerMachine::in_memory();
    let params = codec::to_bytes_canonical(&MakeStudentIdParams {
        text: student_text("abc123"),
    })
    .unwrap();
    assert_eq!(
        ledger.submit(signer(1), GradeBookService::MAKE_STUDENT_ID, &params).unwrap(),
        1
    );

    let params = codec::to_bytes_canonical(&RecordEvaluationParams {
        student_id: StudentId(1),
        activity_id: 7,
        scores: sample_scores(),
    })
    .unwrap();
    assert_eq!(
        ledger.submit(signer(1), GradeBookService::RECORD_EVALUATION, &params).unwrap(),
        2
    );

    let params = codec::to_bytes_canonical(&RecordEvaluationForStudentTextParams {
        text: student_text("abc123"),
        activity_id: 8,
        scores: sample_scores(),
    })
    .unwrap();
    ledger
        .submit(signer(1), GradeBookService::RECORD_EVALUATION_FOR_STUDENT_TEXT, &params)
        .unwrap();
    assert_eq!(
        ledger.reader().unwrap().evaluation_count_by_student(StudentId(1)).unwrap(),
        2
    );

    let err = assert_err!(ledger.submit(signer(1), "amend_evaluation@v1", &[]));
    assert_eq!(err.code(), "TX_UNSUPPORTED");
    assert_eq!(ledger.reader().unwrap().sequence(), 3);
}

#[test]
fn concurrent_writers_are_serialized() {
    let ledger = Arc::new(LedgerMachine::in_memory());
    let handles: Vec<_> = (0..4u8)
        .map(|who| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                for activity in 0..25 {
                    ledger
                        .record_evaluation_for_student_text(
                            signer(who),
                            &student_text("shared"),
                            activity,
                            &sample_scores(),
                        )
                        .unwrap();
                    let reader = ledger.reader().unwrap();
                    let total = reader.evaluation_count().unwrap();
                    let last = reader.evaluation(EvaluationId(total - 1)).unwrap();
                    assert_eq!(last.student_text, student_text("shared"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reader = ledger.reader().unwrap();
    assert_eq!(reader.evaluation_count().unwrap(), 100);
    assert_eq!(reader.student_count().unwrap(), 1);
    assert_eq!(reader.recorder_count().unwrap(), 4);
    let per_recorder: u64 = (1..=4)
        .map(|r| reader.evaluation_count_by_recorder(RecorderId(r)).unwrap())
        .sum();
    assert_eq!(per_recorder, 100);
    assert_eq!(reader.evaluation_count_by_student(StudentId(1)).unwrap(), 100);
}

#[test]
fn concurrent_writers_publish_in_commit_order() {
    const WRITERS: u8 = 8;
    const PER_WRITER: u64 = 100;
    let (tx, mut rx) = broadcast::channel(WRITERS as usize * PER_WRITER as usize);
    let ledger = Arc::new(LedgerMachine::in_memory().with_event_sender(tx));

    let handles: Vec<_> = (0..WRITERS)
        .map(|who| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                for activity in 0..PER_WRITER {
                    ledger
                        .record_evaluation_for_student_text(
                            signer(who),
                            &student_text("crowd"),
                            activity,
                            &sample_scores(),
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut published = Vec::new();
    while let Ok(LedgerEvent::EvaluationRecorded { evaluation_id, .. }) = rx.try_recv() {
        published.push(evaluation_id.0);
    }
    let expected: Vec<u64> = (0..WRITERS as u64 * PER_WRITER).collect();
    assert_eq!(published, expected);
}
