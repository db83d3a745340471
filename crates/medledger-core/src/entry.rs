//! Raw, undecoded log entries as delivered by the ledger collaborator.

use serde::{Deserialize, Serialize};

/// A raw log entry emitted by the ledger contract, prior to interpretation.
/// This is the input to the decoder; it is produced by a `LedgerClient`
/// implementation and never constructed by the pipeline itself.
///
/// Identity is positional: `(block_number, log_index)` uniquely identifies
/// an entry within one ledger instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLogEntry {
    /// Contract address that emitted the log (`0x…`).
    pub address: String,
    /// topics[0] is the event signature hash; additional topics are the
    /// indexed parameters, each a 32-byte value hex-encoded with `0x` prefix.
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed parameters.
    pub data: Vec<u8>,
    /// Block number the log was included in.
    pub block_number: u64,
    /// Log index within the block.
    pub log_index: u32,
    /// Hash of the transaction that produced the log.
    pub tx_hash: String,
}

impl RawLogEntry {
    /// Returns topics[0], the event signature hash, if present.
    pub fn signature_topic(&self) -> Option<&str> {
        self.topics.first().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_topic_first() {
        let entry = RawLogEntry {
            address: "0x0".into(),
            topics: vec!["0xaaaa".into(), "0xbbbb".into()],
            data: vec![],
            block_number: 1,
            log_index: 0,
            tx_hash: "0x0".into(),
        };
        assert_eq!(entry.signature_topic(), Some("0xaaaa"));
    }

    #[test]
    fn signature_topic_empty() {
        let entry = RawLogEntry {
            address: "0x0".into(),
            topics: vec![],
            data: vec![],
            block_number: 1,
            log_index: 0,
            tx_hash: "0x0".into(),
        };
        assert!(entry.signature_topic().is_none());
    }
}
