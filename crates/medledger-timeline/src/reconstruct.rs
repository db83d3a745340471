//! Timeline synthesis from a batch snapshot.

use serde::{Deserialize, Serialize};

use crate::snapshot::BatchSnapshot;

const DAY_SECS: i64 = 86_400;

/// The closed set of lifecycle steps a reconstruction can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineKind {
    Created,
    Dispensed,
    Flagged,
    Recalled,
}

/// Per-step payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimelineDetails {
    Created {
        origin: String,
        total_units: u64,
        expires_at: i64,
    },
    Dispensed {
        quantity: u64,
        remaining: u64,
    },
    Flagged {
        reason: Option<String>,
    },
    Recalled {
        reason: Option<String>,
    },
}

/// One step of a reconstructed batch lifecycle. Derived, not authoritative;
/// lives only for the duration of one reconstruction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub kind: TimelineKind,
    /// Unix seconds. Recorded when `approximate` is false, synthesized
    /// otherwise.
    pub timestamp: i64,
    /// The address this step is attributed to. Without per-event history the
    /// only address the snapshot holds is the manufacturer's.
    pub actor: String,
    /// True when `timestamp` was placed by the fixed-offset policy rather
    /// than read from the ledger.
    pub approximate: bool,
    pub details: TimelineDetails,
}

/// Offsets applied to `manufactured_at` when placing synthesized steps.
/// Configuration constants, not measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproxOffsets {
    /// Offset of a `Dispensed` step, in seconds.
    pub dispensed: i64,
    /// Offset of a `Flagged` step, in seconds.
    pub flagged: i64,
    /// Offset of a `Recalled` step, in seconds.
    pub recalled: i64,
}

impl Default for ApproxOffsets {
    fn default() -> Self {
        Self {
            dispensed: 7 * DAY_SECS,
            flagged: 14 * DAY_SECS,
            recalled: 21 * DAY_SECS,
        }
    }
}

/// Synthesize an ordered lifecycle for one batch from its current snapshot,
/// newest step first.
///
/// Always emits `Created` at the recorded manufacture time. Emits
/// `Dispensed` / `Flagged` / `Recalled` only when the snapshot shows that
/// state, each placed at its configured offset and tagged approximate. See
/// the crate docs for the full approximation policy.
pub fn reconstruct(snapshot: &BatchSnapshot, offsets: &ApproxOffsets) -> Vec<TimelineEntry> {
    let mut entries = vec![TimelineEntry {
        kind: TimelineKind::Created,
        timestamp: snapshot.manufactured_at,
        actor: snapshot.manufacturer.clone(),
        approximate: false,
        details: TimelineDetails::Created {
            origin: snapshot.origin.clone(),
            total_units: snapshot.total_units,
            expires_at: snapshot.expires_at,
        },
    }];

    if snapshot.dispensed_units > 0 {
        entries.push(TimelineEntry {
            kind: TimelineKind::Dispensed,
            timestamp: snapshot.manufactured_at + offsets.dispensed,
            actor: snapshot.manufacturer.clone(),
            approximate: true,
            details: TimelineDetails::Dispensed {
                quantity: snapshot.dispensed_units,
                remaining: snapshot.remaining_units(),
            },
        });
    }

    if snapshot.is_flagged {
        entries.push(TimelineEntry {
            kind: TimelineKind::Flagged,
            timestamp: snapshot.manufactured_at + offsets.flagged,
            actor: snapshot.manufacturer.clone(),
            approximate: true,
            details: TimelineDetails::Flagged {
                reason: snapshot.flag_reason.clone(),
            },
        });
    }

    if snapshot.is_recalled {
        entries.push(TimelineEntry {
            kind: TimelineKind::Recalled,
            timestamp: snapshot.manufactured_at + offsets.recalled,
            actor: snapshot.manufacturer.clone(),
            approximate: true,
            details: TimelineDetails::Recalled {
                reason: snapshot.recall_reason.clone(),
            },
        });
    }

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn snapshot() -> BatchSnapshot {
        BatchSnapshot {
            id: 9,
            batch_number: "BATCH-2024-0009".into(),
            medicine_name: "Paracetamol 650mg".into(),
            generic_name: "paracetamol".into(),
            manufacturer: "0x2222222222222222222222222222222222222222".into(),
            origin: "Plant B".into(),
            manufactured_at: T0,
            expires_at: T0 + 365 * 86_400,
            total_units: 100,
            dispensed_units: 0,
            is_flagged: false,
            flag_reason: None,
            is_recalled: false,
            recall_reason: None,
        }
    }

    #[test]
    fn pristine_batch_yields_only_created() {
        let entries = reconstruct(&snapshot(), &ApproxOffsets::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, TimelineKind::Created);
        assert_eq!(entries[0].timestamp, T0);
        assert!(!entries[0].approximate);
    }

    #[test]
    fn dispensed_batch_yields_dispensed_then_created() {
        let mut s = snapshot();
        s.dispensed_units = 50;
        let entries = reconstruct(&s, &ApproxOffsets::default());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, TimelineKind::Dispensed);
        assert_eq!(entries[0].timestamp, T0 + 7 * 86_400);
        assert!(entries[0].approximate);
        assert_eq!(
            entries[0].details,
            TimelineDetails::Dispensed {
                quantity: 50,
                remaining: 50
            }
        );
        assert_eq!(entries[1].kind, TimelineKind::Created);
        assert_eq!(entries[1].timestamp, T0);
    }

    #[test]
    fn full_lifecycle_sorted_descending() {
        let mut s = snapshot();
        s.dispensed_units = 10;
        s.is_flagged = true;
        s.flag_reason = Some("suspicious packaging".into());
        s.is_recalled = true;
        s.recall_reason = Some("regulator order".into());

        let entries = reconstruct(&s, &ApproxOffsets::default());
        let kinds: Vec<TimelineKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                TimelineKind::Recalled,
                TimelineKind::Flagged,
                TimelineKind::Dispensed,
                TimelineKind::Created,
            ]
        );
        for pair in entries.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
    }

    #[test]
    fn only_created_timestamp_is_exact() {
        let mut s = snapshot();
        s.dispensed_units = 1;
        s.is_flagged = true;
        let entries = reconstruct(&s, &ApproxOffsets::default());
        for entry in &entries {
            assert_eq!(entry.approximate, entry.kind != TimelineKind::Created);
        }
    }

    #[test]
    fn custom_offsets_are_respected() {
        let mut s = snapshot();
        s.dispensed_units = 5;
        let offsets = ApproxOffsets {
            dispensed: 60,
            flagged: 120,
            recalled: 180,
        };
        let entries = reconstruct(&s, &offsets);
        assert_eq!(entries[0].timestamp, T0 + 60);
    }
}
