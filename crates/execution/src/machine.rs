// Path: crates/execution/src/machine.rs
use crate::reader::LedgerReader;
use anyhow::{bail, Context, Result};
use gradebook_api::services::LedgerService;
use gradebook_api::state::{
    service_namespace_prefix, NamespacedStateAccess, StateAccess, StateOverlay,
};
use gradebook_api::transaction::context::TxContext;
use gradebook_services::gradebook::{EvaluationLedger, GradeBookService, StudentRegistry};
use gradebook_storage::{wal, MemoryStore, WalWriter};
use gradebook_telemetry::time::Timer;
use gradebook_telemetry::{error_metrics, ledger_metrics};
use gradebook_types::app::{
    AccountId, EvaluationId, LedgerEvent, ScoreInput, StudentId, StudentText,
};
use gradebook_types::config::LedgerConfig;
use gradebook_types::error::{ErrorCode, StateError, TransactionError};
use std::fmt::Debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// The committed state guarded by the writer lock.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub(crate) store: MemoryStore,
    /// The sequence of the last committed write; 0 for an empty ledger.
    pub(crate) sequence: u64,
}

/// The single-writer coordinator of a gradebook ledger.
///
/// # Commit Protocol
///
/// A write holds the exclusive lock for its whole lifetime:
/// 1. the service runs against a `StateOverlay`, namespaced under
///    `_service_data::gradebook::`; an error drops the overlay and nothing changes;
/// 2. the overlay's ordered change set is appended to the WAL (if any);
/// 3. the change set is applied to the in-memory store and the sequence advances;
/// 4. the write's events are broadcast before the lock is released, so observers
///    receive them in commit order. Broadcasting never blocks.
///
/// Readers share the lock, so they always observe a state between two commits.
pub struct LedgerMachine {
    inner: RwLock<LedgerState>,
    wal: Option<WalWriter>,
    service: GradeBookService,
    event_tx: Option<broadcast::Sender<LedgerEvent>>,
}

impl Debug for LedgerMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerMachine")
            .field("wal", &self.wal.as_ref().map(|w| w.path().to_path_buf()))
            .field("service", &self.service.id())
            .field("event_tx", &self.event_tx.is_some())
            .finish()
    }
}

impl LedgerMachine {
    /// Creates an empty, non-durable ledger.
    pub fn in_memory() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
            wal: None,
            service: GradeBookService,
            event_tx: None,
        }
    }

    /// Opens the ledger stored under `config.data_dir`, replaying its WAL.
    ///
    /// A torn trailing entry is truncated away. A corrupt entry or a gap in the
    /// commit sequence is a hard error.
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data dir {}", config.data_dir.display())
        })?;
        let path = config.wal_path();

        let mut state = LedgerState::default();
        for entry in wal::recover(&path)? {
            let expected = state.sequence + 1;
            if entry.sequence != expected {
                bail!(
                    "WAL {} is out of order: expected commit {}, found {}",
                    path.display(),
                    expected,
                    entry.sequence
                );
            }
            state.store.batch_apply(&entry.inserts)?;
            state.sequence = entry.sequence;
        }
        tracing::info!(
            target: "execution",
            event = "replay",
            commits = state.sequence,
            keys = state.store.len(),
            wal = %path.display(),
            "ledger opened"
        );
        ledger_metrics().set_replayed_commits(state.sequence);

        Ok(Self {
            inner: RwLock::new(state),
            wal: Some(WalWriter::open(&path, config.sync_writes)?),
            service: GradeBookService,
            event_tx: None,
        })
    }

    /// Publishes every committed event on `tx`.
    pub fn with_event_sender(mut self, tx: broadcast::Sender<LedgerEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Subscribes to committed events, if an event sender is attached.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<LedgerEvent>> {
        self.event_tx.as_ref().map(|tx| tx.subscribe())
    }

    /// Takes a consistent read snapshot. Writers wait until it is dropped.
    pub fn reader(&self) -> Result<LedgerReader<'_>, StateError> {
        Ok(LedgerReader::new(
            self.read_lock()?,
            service_namespace_prefix(self.service.id()),
        ))
    }

    /// Registers a student. Fails with `DuplicateStudent` if the text is bound.
    pub fn make_student_id(
        &self,
        signer: AccountId,
        text: &StudentText,
    ) -> Result<StudentId, TransactionError> {
        self.transact(signer, GradeBookService::MAKE_STUDENT_ID, |state, _ctx| {
            StudentRegistry::create(state, text)
        })
    }

    pub fn record_evaluation(
        &self,
        signer: AccountId,
        student_id: StudentId,
        activity_id: u64,
        scores: &ScoreInput,
    ) -> Result<EvaluationId, TransactionError> {
        self.transact(signer, GradeBookService::RECORD_EVALUATION, |state, ctx| {
            EvaluationLedger::record(state, ctx, student_id, activity_id, scores)
        })
    }

    pub fn record_evaluation_for_student_text(
        &self,
        signer: AccountId,
        text: &StudentText,
        activity_id: u64,
        scores: &ScoreInput,
    ) -> Result<EvaluationId, TransactionError> {
        self.transact(
            signer,
            GradeBookService::RECORD_EVALUATION_FOR_STUDENT_TEXT,
            |state, ctx| EvaluationLedger::record_for_student_text(state, ctx, text, activity_id, scores),
        )
    }

    /// Executes any service method from SCALE-encoded params and returns the
    /// sequence of the resulting commit.
    pub fn submit(
        &self,
        signer: AccountId,
        method: &str,
        params: &[u8],
    ) -> Result<u64, TransactionError> {
        self.transact(signer, method, |state, ctx| {
            self.service.handle_service_call(state, method, params, ctx)?;
            Ok(ctx.sequence)
        })
    }

    pub(crate) fn transact<T, F>(
        &self,
        signer: AccountId,
        method: &str,
        op: F,
    ) -> Result<T, TransactionError>
    where
        F: FnOnce(&mut dyn StateAccess, &mut TxContext) -> Result<T, TransactionError>,
    {
        let metrics = ledger_metrics();
        let _timer = Timer::new(metrics);
        let label = method_label(method);

        let (value, recorded) = match self.execute(signer, op) {
            Ok(done) => done,
            Err(e) => {
                metrics.inc_writes_rejected(label, e.code());
                tracing::debug!(target: "execution", method, code = e.code(), "write rejected: {}", e);
                return Err(e);
            }
        };

        metrics.inc_writes_committed(label);
        if recorded > 0 {
            metrics.inc_evaluations_recorded(recorded);
        }
        Ok(value)
    }

    fn execute<T, F>(
        &self,
        signer: AccountId,
        op: F,
    ) -> Result<(T, u64), TransactionError>
    where
        F: FnOnce(&mut dyn StateAccess, &mut TxContext) -> Result<T, TransactionError>,
    {
        let mut guard = self.write_lock()?;
        let sequence = guard.sequence + 1;
        let mut ctx = TxContext::new(sequence, signer);

        let (value, inserts) = {
            let mut overlay = StateOverlay::new(&guard.store);
            let value = {
                let mut namespaced = NamespacedStateAccess::new(
                    &mut overlay,
                    service_namespace_prefix(self.service.id()),
                );
                op(&mut namespaced, &mut ctx)?
            };
            (value, overlay.into_ordered_batch())
        };

        if let Some(wal) = &self.wal {
            let written = wal.append_commit(sequence, &inserts).map_err(|e| {
                error_metrics().inc_error("storage", "wal_append");
                tracing::error!(target: "execution", sequence, "WAL append failed: {:#}", e);
                StateError::WriteError(format!("{:#}", e))
            })?;
            ledger_metrics().inc_wal_bytes_written(written);
        }
        guard.store.batch_apply(&inserts)?;
        guard.sequence = sequence;
        let recorded = ctx
            .events
            .iter()
            .filter(|e| matches!(e, LedgerEvent::EvaluationRecorded { .. }))
            .count() as u64;
        self.publish(ctx.events);
        drop(guard);

        tracing::debug!(target: "execution", event = "commit", sequence, keys = inserts.len());
        Ok((value, recorded))
    }

    /// Called with the write lock held.
    fn publish(&self, events: Vec<LedgerEvent>) {
        if let Some(tx) = &self.event_tx {
            for event in events {
                // No receivers is not an error; delivery is best-effort.
                let _ = tx.send(event);
            }
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, LedgerState>, StateError> {
        self.inner
            .read()
            .map_err(|_| StateError::Backend("ledger lock poisoned".into()))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, StateError> {
        self.inner
            .write()
            .map_err(|_| StateError::Backend("ledger lock poisoned".into()))
    }
}

/// Bounds the metric label set to the service's own methods.
fn method_label(method: &str) -> &'static str {
    match method {
        GradeBookService::MAKE_STUDENT_ID => GradeBookService::MAKE_STUDENT_ID,
        GradeBookService::RECORD_EVALUATION => GradeBookService::RECORD_EVALUATION,
        GradeBookService::RECORD_EVALUATION_FOR_STUDENT_TEXT => {
            GradeBookService::RECORD_EVALUATION_FOR_STUDENT_TEXT
        }
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_test_utils::fixtures::{sample_scores, signer, student_text};
    use gradebook_test_utils::{assert_err, assert_gradebook_err, assert_ok};
    use gradebook_types::error::GradeBookError;

    #[test]
    fn failed_write_leaves_no_trace() {
        let ledger = LedgerMachine::in_memory();
        let err = assert_err!(ledger.transact(signer(1), "test", |state, _ctx| {
            StudentRegistry::create(state, &student_text("phantom"))?;
            Err::<(), _>(TransactionError::InvalidInput("abort".into()))
        }));
        assert_eq!(err.code(), "TX_INVALID_INPUT");

        let reader = ledger.reader().unwrap();
        assert_eq!(reader.sequence(), 0);
        assert_eq!(reader.student_count().unwrap(), 0);
        assert!(reader.student_id(&student_text("phantom")).unwrap().is_none());
    }

    #[test]
    fn sequence_advances_only_on_commit() {
        let ledger = LedgerMachine::in_memory();
        assert_ok!(ledger.make_student_id(signer(1), &student_text("a")));
        assert_gradebook_err!(
            ledger.make_student_id(signer(1), &student_text("a")),
            GradeBookError::DuplicateStudent(student_text("a"))
        );
        assert_ok!(ledger.record_evaluation(signer(1), StudentId(1), 3, &sample_scores()));
        assert_eq!(ledger.reader().unwrap().sequence(), 2);
    }

    #[test]
    fn wal_failure_fails_the_write_without_state_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.wal");
        std::fs::File::create(&path).unwrap();
        let read_only = std::fs::File::open(&path).unwrap();

        let (tx, mut rx) = broadcast::channel(4);
        let ledger = LedgerMachine {
            inner: RwLock::new(LedgerState::default()),
            wal: Some(WalWriter::from_file(&path, read_only, false).unwrap()),
            service: GradeBookService,
            event_tx: Some(tx),
        };

        let err = assert_err!(ledger.record_evaluation_for_student_text(
            signer(1),
            &student_text("abc123"),
            7,
            &sample_scores(),
        ));
        assert_eq!(err.code(), "STATE_WRITE_ERROR");

        let reader = ledger.reader().unwrap();
        assert_eq!(reader.sequence(), 0);
        assert_eq!(reader.student_count().unwrap(), 0);
        assert_eq!(reader.recorder_count().unwrap(), 0);
        assert_eq!(reader.evaluation_count().unwrap(), 0);
        drop(reader);
        assert!(rx.try_recv().is_err());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn unknown_methods_share_one_metric_label() {
        assert_eq!(
            method_label(GradeBookService::RECORD_EVALUATION),
            "record_evaluation@v1"
        );
        assert_eq!(method_label("amend_evaluation@v1"), "unknown");
        assert_eq!(method_label("test"), "unknown");
    }

    #[test]
    fn writes_are_confined_to_the_service_namespace() {
        let ledger = LedgerMachine::in_memory();
        ledger.make_student_id(signer(1), &student_text("a")).unwrap();
        let guard = ledger.read_lock().unwrap();
        assert!(guard
            .store
            .iter()
            .all(|(k, _)| k.starts_with(b"_service_data::gradebook::")));
    }
}
