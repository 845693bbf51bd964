// Path: crates/api/src/services/mod.rs
//! Traits for pluggable ledger services.

use crate::state::StateAccess;
use crate::transaction::context::TxContext;
use gradebook_types::error::TransactionError;

/// The base trait for any service hosted by the ledger executor.
///
/// # Storage Invariant: Namespaced Access
///
/// The `StateAccess` passed to `handle_service_call` is scoped to the service's
/// private namespace: a key `k` is physically stored as `_service_data::{id}::{k}`.
/// It is also a transactional overlay, so returning an error discards every write
/// the call made.
pub trait LedgerService: Send + Sync {
    /// A unique, static, lowercase string identifier for the service.
    fn id(&self) -> &str;

    /// Handles a dispatched call with SCALE-encoded `params`.
    ///
    /// Methods the service does not expose fail with `Unsupported`.
    fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError>;
}
