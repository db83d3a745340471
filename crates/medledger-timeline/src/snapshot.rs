//! Point-in-time batch state as held by the ledger.

use serde::{Deserialize, Serialize};

/// Current aggregate state of one medicine batch, as returned by the ledger
/// collaborator's batch lookup. This is *state*, not history: totals, flags,
/// and timestamps, with no record of the individual events that produced
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSnapshot {
    /// Ledger-assigned batch id.
    pub id: u64,
    /// Human-facing batch number, e.g. `"BATCH-2024-0001"`.
    pub batch_number: String,
    /// Brand name of the medicine.
    pub medicine_name: String,
    /// Generic (INN) name.
    pub generic_name: String,
    /// Manufacturer's ledger address.
    pub manufacturer: String,
    /// Free-form origin, e.g. a plant or country.
    pub origin: String,
    /// Unix seconds at manufacture, recorded on the ledger.
    pub manufactured_at: i64,
    /// Unix seconds at expiry.
    pub expires_at: i64,
    /// Units produced.
    pub total_units: u64,
    /// Units dispensed so far.
    pub dispensed_units: u64,
    /// Whether the batch is flagged as suspicious.
    pub is_flagged: bool,
    /// Reason recorded when flagging, if any.
    pub flag_reason: Option<String>,
    /// Whether the batch has been recalled.
    pub is_recalled: bool,
    /// Reason recorded when recalling, if any.
    pub recall_reason: Option<String>,
}

/// Display status of a batch, derived from its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    Recalled,
    Flagged,
    Expired,
    Active,
}

impl BatchSnapshot {
    /// Units not yet dispensed.
    pub fn remaining_units(&self) -> u64 {
        self.total_units.saturating_sub(self.dispensed_units)
    }

    /// Derive the batch's display status at `now` (unix seconds).
    /// Precedence: recalled beats flagged beats expired.
    pub fn status(&self, now: i64) -> BatchStatus {
        if self.is_recalled {
            BatchStatus::Recalled
        } else if self.is_flagged {
            BatchStatus::Flagged
        } else if self.expires_at <= now {
            BatchStatus::Expired
        } else {
            BatchStatus::Active
        }
    }
}
