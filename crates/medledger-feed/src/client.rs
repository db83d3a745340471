//! The ledger collaborator interface.

use async_trait::async_trait;
use thiserror::Error;

use medledger_core::RawLogEntry;
use medledger_timeline::BatchSnapshot;

/// Errors from the ledger collaborator.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger is unreachable or the connection dropped. Transient: the
    /// poller retries on its next tick.
    #[error("ledger transport error: {0}")]
    Transport(String),

    /// The ledger answered with something unparsable. Also retried; a
    /// provider glitch looks the same as an outage from here.
    #[error("malformed ledger response: {0}")]
    MalformedResponse(String),

    /// The requested batch does not exist on the ledger. Not transient;
    /// surfaced to the caller as-is.
    #[error("no batch found for '{batch_number}'")]
    SnapshotNotFound { batch_number: String },
}

impl LedgerError {
    /// Whether the poller should treat this as retry-next-tick.
    pub fn is_transient(&self) -> bool {
        !matches!(self, LedgerError::SnapshotNotFound { .. })
    }
}

/// Read-only view of the ledger. One implementation per transport (JSON-RPC
/// over HTTP in production, scripted in-process ledgers in tests and the
/// demo).
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current head block number.
    async fn current_head(&self) -> Result<u64, LedgerError>;

    /// All logs emitted by `address` in the inclusive block range
    /// `[from, to]`, in `(block_number, log_index)` ascending order.
    async fn get_logs(
        &self,
        address: &str,
        from: u64,
        to: u64,
    ) -> Result<Vec<RawLogEntry>, LedgerError>;

    /// Point-in-time state of one batch, looked up by batch number.
    async fn get_batch_snapshot(&self, batch_number: &str) -> Result<BatchSnapshot, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_not_found_is_not_transient() {
        let err = LedgerError::SnapshotNotFound {
            batch_number: "BATCH-X".into(),
        };
        assert!(!err.is_transient());
        assert!(LedgerError::Transport("connection refused".into()).is_transient());
        assert!(LedgerError::MalformedResponse("bad json".into()).is_transient());
    }
}
