//! Typed, decoded ledger events.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── EventKind ────────────────────────────────────────────────────────────────

/// The closed set of events the ledger contract emits. Adding a kind is a
/// deploy-time change that goes hand in hand with a new schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    PrescriptionCreated,
    PrescriptionDispensed,
    PrescriptionUpdated,
    PrescriptionRevoked,
    BatchCreated,
    BatchDispensed,
    BatchRecalled,
    BatchFlagged,
    FakeMedicineAlert,
    UserRegistered,
    UserVerified,
    UserDeactivated,
}

/// Top-level grouping of event kinds, used by the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDomain {
    Prescription,
    Batch,
    User,
}

impl EventKind {
    /// All kinds, in registry order.
    pub const ALL: [EventKind; 12] = [
        EventKind::PrescriptionCreated,
        EventKind::PrescriptionDispensed,
        EventKind::PrescriptionUpdated,
        EventKind::PrescriptionRevoked,
        EventKind::BatchCreated,
        EventKind::BatchDispensed,
        EventKind::BatchRecalled,
        EventKind::BatchFlagged,
        EventKind::FakeMedicineAlert,
        EventKind::UserRegistered,
        EventKind::UserVerified,
        EventKind::UserDeactivated,
    ];

    /// The domain this kind belongs to.
    ///
    /// `FakeMedicineAlert` is a batch-domain event: the original contract
    /// emits it against a batch id.
    pub fn domain(&self) -> EventDomain {
        match self {
            EventKind::PrescriptionCreated
            | EventKind::PrescriptionDispensed
            | EventKind::PrescriptionUpdated
            | EventKind::PrescriptionRevoked => EventDomain::Prescription,
            EventKind::BatchCreated
            | EventKind::BatchDispensed
            | EventKind::BatchRecalled
            | EventKind::BatchFlagged
            | EventKind::FakeMedicineAlert => EventDomain::Batch,
            EventKind::UserRegistered
            | EventKind::UserVerified
            | EventKind::UserDeactivated => EventDomain::User,
        }
    }

    /// High-severity kinds surfaced by the alerts-only filter.
    pub fn is_alert(&self) -> bool {
        matches!(self, EventKind::FakeMedicineAlert | EventKind::BatchRecalled)
    }

    /// Human-readable label for feed display.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::PrescriptionCreated => "Prescription Created",
            EventKind::PrescriptionDispensed => "Prescription Dispensed",
            EventKind::PrescriptionUpdated => "Prescription Updated",
            EventKind::PrescriptionRevoked => "Prescription Revoked",
            EventKind::BatchCreated => "Batch Created",
            EventKind::BatchDispensed => "Batch Dispensed",
            EventKind::BatchRecalled => "Batch Recalled",
            EventKind::BatchFlagged => "Batch Flagged",
            EventKind::FakeMedicineAlert => "Fake Medicine Alert",
            EventKind::UserRegistered => "User Registered",
            EventKind::UserVerified => "User Verified",
            EventKind::UserDeactivated => "User Deactivated",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ─── EventId ─────────────────────────────────────────────────────────────────

/// Deterministic event identity: the `(block_number, log_index)` position.
/// Two fetches of the same log always yield the same id, which is what makes
/// overlap re-scans dedup for free in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId {
    pub block_number: u64,
    pub log_index: u32,
}

impl EventId {
    pub fn new(block_number: u64, log_index: u32) -> Self {
        Self {
            block_number,
            log_index,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.block_number, self.log_index)
    }
}

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// A decoded event argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    /// Unsigned integer that fits in a u128 (covers ids, units, roles,
    /// timestamps in practice).
    Uint(u128),
    /// uint256 values wider than u128, as a decimal string.
    BigUint(String),
    /// 20-byte address, hex with `0x` prefix, EIP-55 checksummed.
    Address(String),
    /// UTF-8 string.
    Str(String),
}

impl FieldValue {
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            FieldValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            FieldValue::Address(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Uint(v) => write!(f, "{v}"),
            FieldValue::BigUint(v) => write!(f, "{v}"),
            FieldValue::Address(a) => write!(f, "{a}"),
            FieldValue::Str(s) => write!(f, "{s}"),
        }
    }
}

// ─── DecodedEvent ────────────────────────────────────────────────────────────

/// A fully decoded ledger event, the primary output of the decoder and the
/// unit stored in the feed buffer. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedEvent {
    /// Positional identity, `(block_number, log_index)`.
    pub id: EventId,
    /// Which of the twelve known events this is.
    pub kind: EventKind,
    /// Block number the log was included in.
    pub block_number: u64,
    /// Log index within the block.
    pub log_index: u32,
    /// Transaction hash.
    pub tx_hash: String,
    /// Decoded arguments, in schema field order.
    pub args: IndexMap<String, FieldValue>,
    /// Wall-clock time this process observed the event. Not a ledger
    /// timestamp; the ledger's own timestamp is an ordinary `args` field.
    pub observed_at: DateTime<Utc>,
}

impl DecodedEvent {
    /// Get a decoded argument by field name.
    pub fn arg(&self, name: &str) -> Option<&FieldValue> {
        self.args.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_display() {
        assert_eq!(EventId::new(19_000_000, 2).to_string(), "19000000-2");
    }

    #[test]
    fn domains_cover_all_kinds() {
        let prescriptions = EventKind::ALL
            .iter()
            .filter(|k| k.domain() == EventDomain::Prescription)
            .count();
        let batches = EventKind::ALL
            .iter()
            .filter(|k| k.domain() == EventDomain::Batch)
            .count();
        let users = EventKind::ALL
            .iter()
            .filter(|k| k.domain() == EventDomain::User)
            .count();
        assert_eq!((prescriptions, batches, users), (4, 5, 3));
    }

    #[test]
    fn alert_kinds() {
        assert!(EventKind::FakeMedicineAlert.is_alert());
        assert!(EventKind::BatchRecalled.is_alert());
        assert!(!EventKind::BatchFlagged.is_alert());
        assert!(!EventKind::PrescriptionCreated.is_alert());
    }

    #[test]
    fn field_value_serde_roundtrip() {
        let val = FieldValue::Address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into());
        let json = serde_json::to_string(&val).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(val, back);
    }
}
