//! Stateless categorization over feed snapshots.

use serde::{Deserialize, Serialize};

use medledger_core::{DecodedEvent, EventDomain, EventKind};

/// Feed display categories. `Alerts` is a fixed subset of high-severity
/// kinds, not a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    #[default]
    All,
    Prescriptions,
    Batches,
    Users,
    Alerts,
}

impl FeedFilter {
    /// All filters, in display order.
    pub const ALL: [FeedFilter; 5] = [
        FeedFilter::All,
        FeedFilter::Prescriptions,
        FeedFilter::Batches,
        FeedFilter::Users,
        FeedFilter::Alerts,
    ];

    /// Whether an event of `kind` belongs to this category.
    pub fn matches(&self, kind: EventKind) -> bool {
        match self {
            FeedFilter::All => true,
            FeedFilter::Prescriptions => kind.domain() == EventDomain::Prescription,
            FeedFilter::Batches => kind.domain() == EventDomain::Batch,
            FeedFilter::Users => kind.domain() == EventDomain::User,
            FeedFilter::Alerts => kind.is_alert(),
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            FeedFilter::All => "All Events",
            FeedFilter::Prescriptions => "Prescriptions",
            FeedFilter::Batches => "Batches",
            FeedFilter::Users => "Users",
            FeedFilter::Alerts => "Alerts Only",
        }
    }
}

/// Order-preserving subsequence of `snapshot` matching `filter`. Pure;
/// operates on a snapshot, never on the live store.
pub fn filter_events(snapshot: &[DecodedEvent], filter: FeedFilter) -> Vec<DecodedEvent> {
    snapshot
        .iter()
        .filter(|e| filter.matches(e.kind))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use medledger_core::EventId;

    fn event(block: u64, kind: EventKind) -> DecodedEvent {
        DecodedEvent {
            id: EventId::new(block, 0),
            kind,
            block_number: block,
            log_index: 0,
            tx_hash: "0x0".into(),
            args: Default::default(),
            observed_at: Utc::now(),
        }
    }

    fn sample_feed() -> Vec<DecodedEvent> {
        vec![
            event(110, EventKind::FakeMedicineAlert),
            event(109, EventKind::UserVerified),
            event(108, EventKind::BatchDispensed),
            event(107, EventKind::PrescriptionCreated),
            event(106, EventKind::BatchRecalled),
            event(105, EventKind::PrescriptionDispensed),
        ]
    }

    #[test]
    fn all_passes_everything_through() {
        let feed = sample_feed();
        assert_eq!(filter_events(&feed, FeedFilter::All).len(), feed.len());
    }

    #[test]
    fn domain_filters_select_their_kinds() {
        let feed = sample_feed();
        let prescriptions = filter_events(&feed, FeedFilter::Prescriptions);
        assert_eq!(prescriptions.len(), 2);
        let batches = filter_events(&feed, FeedFilter::Batches);
        // BatchDispensed, BatchRecalled, FakeMedicineAlert
        assert_eq!(batches.len(), 3);
        let users = filter_events(&feed, FeedFilter::Users);
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn alerts_are_the_fixed_high_severity_subset() {
        let feed = sample_feed();
        let alerts = filter_events(&feed, FeedFilter::Alerts);
        let kinds: Vec<EventKind> = alerts.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EventKind::FakeMedicineAlert, EventKind::BatchRecalled]);
    }

    #[test]
    fn filtering_preserves_relative_order() {
        let feed = sample_feed();
        let batches = filter_events(&feed, FeedFilter::Batches);
        let blocks: Vec<u64> = batches.iter().map(|e| e.block_number).collect();
        assert_eq!(blocks, [110, 108, 106]);
    }
}
