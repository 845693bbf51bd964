// Path: crates/api/src/transaction/context.rs
//! Defines the context for executing one write against the ledger.

use gradebook_types::app::{AccountId, LedgerEvent};

/// Context handed to services while a write executes.
///
/// The signer is supplied by the external access-control layer; the ledger only
/// attributes the write to it. Events pushed here are published by the executor
/// after the write commits and dropped if it fails.
#[derive(Clone, Debug)]
pub struct TxContext {
    /// The commit sequence this write will receive if it succeeds.
    pub sequence: u64,
    /// The identity of the caller submitting the write.
    /// This is the authoritative source for attributing evaluations to a recorder.
    pub signer_account_id: AccountId,
    /// Notifications produced by the write, pending commit.
    pub events: Vec<LedgerEvent>,
}

impl TxContext {
    /// Creates a context for a write by `signer` at `sequence`.
    pub fn new(sequence: u64, signer_account_id: AccountId) -> Self {
        Self {
            sequence,
            signer_account_id,
            events: Vec::new(),
        }
    }

    /// Queues a notification for publication after commit.
    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}
