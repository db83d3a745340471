//! The `demo` command: a scripted in-process ledger driven through the real
//! pipeline — poller, decoder, store, filter, and a batch timeline at the
//! end.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use medledger_core::{EventKind, RawLogEntry, SchemaRegistry};
use medledger_feed::{
    filter_events, EventStore, FeedFilter, LedgerClient, LedgerError, Network, Poller,
    PollerBuilder,
};
use medledger_timeline::{reconstruct, ApproxOffsets, BatchSnapshot, TimelineDetails};

const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
const T0: i64 = 1_700_000_000;

pub async fn run() -> anyhow::Result<()> {
    let ledger = Arc::new(DemoLedger::new());
    let store = Arc::new(EventStore::default());

    let config = PollerBuilder::new()
        .contract_address(CONTRACT)
        .poll_interval(Duration::from_millis(300))
        .overlap_blocks(10)
        .fetch_timeout(Duration::from_millis(200))
        .build_config();

    let mut poller = Poller::new(config, Arc::clone(&ledger), Arc::clone(&store));
    poller.start()?;

    println!("Polling scripted ledger ({})...\n", Network::from_chain_id(31_337));
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    poller.stop().await;

    let snapshot = store.snapshot();
    println!("── Live feed ({} events) ──", snapshot.len());
    for event in &snapshot {
        let args: Vec<String> = event
            .args
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        println!(
            "  block {:>4} • {:<22} {}",
            event.block_number,
            event.kind.label(),
            args.join("  ")
        );
    }

    println!("\n── By category ──");
    for filter in FeedFilter::ALL {
        let matched = filter_events(&snapshot, filter);
        println!("  {:<14} {} events", filter.label(), matched.len());
    }

    let alerts = filter_events(&snapshot, FeedFilter::Alerts);
    println!("\n── {} ({}) ──", FeedFilter::Alerts.label(), alerts.len());
    for event in &alerts {
        println!("  block {:>4} • {}", event.block_number, event.kind.label());
    }

    let batch = ledger.get_batch_snapshot("BATCH-2024-0001").await?;
    let timeline = reconstruct(&batch, &ApproxOffsets::default());
    println!(
        "\n── Timeline for {} ({}) ──",
        batch.batch_number, batch.medicine_name
    );
    for entry in &timeline {
        let marker = if entry.approximate { "~" } else { " " };
        let detail = match &entry.details {
            TimelineDetails::Created { origin, total_units, .. } => {
                format!("{total_units} units from {origin}")
            }
            TimelineDetails::Dispensed { quantity, remaining } => {
                format!("{quantity} dispensed, {remaining} remaining")
            }
            TimelineDetails::Flagged { reason } | TimelineDetails::Recalled { reason } => {
                reason.clone().unwrap_or_default()
            }
        };
        println!("  {marker}{:>12} • {:?} • {detail}", entry.timestamp, entry.kind);
    }
    println!("\n(~ = timestamp synthesized from current state, not recorded)");

    Ok(())
}

/// In-process ledger with a pre-scripted history. The head advances on each
/// poll so consecutive scan windows overlap, exercising the dedup path.
struct DemoLedger {
    head: AtomicU64,
    logs: Mutex<Vec<RawLogEntry>>,
}

impl DemoLedger {
    fn new() -> Self {
        let registry = SchemaRegistry::new();
        let logs = vec![
            batch_created_log(&registry, 101, 0),
            user_verified_log(&registry, 103, 0),
            prescription_dispensed_log(&registry, 104, 0, 42),
            batch_recalled_log(&registry, 106, 0, 1),
        ];
        Self {
            head: AtomicU64::new(106),
            logs: Mutex::new(logs),
        }
    }
}

#[async_trait]
impl LedgerClient for DemoLedger {
    async fn current_head(&self) -> Result<u64, LedgerError> {
        Ok(self.head.fetch_add(1, Ordering::SeqCst))
    }

    async fn get_logs(
        &self,
        address: &str,
        from: u64,
        to: u64,
    ) -> Result<Vec<RawLogEntry>, LedgerError> {
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| {
                l.address.eq_ignore_ascii_case(address)
                    && l.block_number >= from
                    && l.block_number <= to
            })
            .cloned()
            .collect())
    }

    async fn get_batch_snapshot(&self, batch_number: &str) -> Result<BatchSnapshot, LedgerError> {
        if batch_number != "BATCH-2024-0001" {
            return Err(LedgerError::SnapshotNotFound {
                batch_number: batch_number.into(),
            });
        }
        Ok(BatchSnapshot {
            id: 1,
            batch_number: batch_number.into(),
            medicine_name: "Amoxicillin 500mg".into(),
            generic_name: "amoxicillin".into(),
            manufacturer: "0x1111111111111111111111111111111111111111".into(),
            origin: "Plant A, Pune".into(),
            manufactured_at: T0,
            expires_at: T0 + 365 * 86_400,
            total_units: 1_000,
            dispensed_units: 400,
            is_flagged: false,
            flag_reason: None,
            is_recalled: true,
            recall_reason: Some("regulator order".into()),
        })
    }
}

// ── scripted log construction ────────────────────────────────────────────────

fn topic_u64(v: u64) -> String {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&v.to_be_bytes());
    format!("0x{}", hex::encode(bytes))
}

fn topic_address(byte: u8) -> String {
    let mut bytes = [0u8; 32];
    bytes[12..].fill(byte);
    format!("0x{}", hex::encode(bytes))
}

fn abi_u256(v: u64) -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    bytes[24..].copy_from_slice(&v.to_be_bytes());
    bytes
}

fn abi_string_tail(s: &str) -> Vec<u8> {
    let mut out = abi_u256(s.len() as u64);
    let mut content = s.as_bytes().to_vec();
    content.resize(content.len().div_ceil(32) * 32, 0);
    out.extend(content);
    out
}

/// BatchCreated(uint256 indexed id, string batchNumber, string medicineName,
/// address indexed manufacturer, uint256 timestamp)
fn batch_created_log(registry: &SchemaRegistry, block: u64, log_index: u32) -> RawLogEntry {
    let schema = registry.lookup_kind(EventKind::BatchCreated).unwrap();
    let batch_number = abi_string_tail("BATCH-2024-0001");
    let medicine = abi_string_tail("Amoxicillin 500mg");
    let mut data = Vec::new();
    data.extend(abi_u256(96));
    data.extend(abi_u256(96 + batch_number.len() as u64));
    data.extend(abi_u256(T0 as u64));
    data.extend(batch_number);
    data.extend(medicine);
    RawLogEntry {
        address: CONTRACT.into(),
        topics: vec![schema.fingerprint.clone(), topic_u64(1), topic_address(0x11)],
        data,
        block_number: block,
        log_index,
        tx_hash: format!("0x{block:064x}"),
    }
}

/// UserVerified(address indexed user, address indexed verifiedBy, uint256 timestamp)
fn user_verified_log(registry: &SchemaRegistry, block: u64, log_index: u32) -> RawLogEntry {
    let schema = registry.lookup_kind(EventKind::UserVerified).unwrap();
    RawLogEntry {
        address: CONTRACT.into(),
        topics: vec![
            schema.fingerprint.clone(),
            topic_address(0x22),
            topic_address(0x33),
        ],
        data: abi_u256(T0 as u64 + 3_600),
        block_number: block,
        log_index,
        tx_hash: format!("0x{block:064x}"),
    }
}

/// PrescriptionDispensed(uint256 indexed id, address indexed pharmacist,
/// uint256 timestamp)
fn prescription_dispensed_log(
    registry: &SchemaRegistry,
    block: u64,
    log_index: u32,
    prescription_id: u64,
) -> RawLogEntry {
    let schema = registry
        .lookup_kind(EventKind::PrescriptionDispensed)
        .unwrap();
    RawLogEntry {
        address: CONTRACT.into(),
        topics: vec![
            schema.fingerprint.clone(),
            topic_u64(prescription_id),
            topic_address(0x44),
        ],
        data: abi_u256(T0 as u64 + 7_200),
        block_number: block,
        log_index,
        tx_hash: format!("0x{block:064x}"),
    }
}

/// BatchRecalled(uint256 indexed id, string batchNumber, string reason,
/// address indexed recalledBy, uint256 timestamp)
fn batch_recalled_log(
    registry: &SchemaRegistry,
    block: u64,
    log_index: u32,
    batch_id: u64,
) -> RawLogEntry {
    let schema = registry.lookup_kind(EventKind::BatchRecalled).unwrap();
    let batch_number = abi_string_tail("BATCH-2024-0001");
    let reason = abi_string_tail("regulator order");
    let mut data = Vec::new();
    data.extend(abi_u256(96));
    data.extend(abi_u256(96 + batch_number.len() as u64));
    data.extend(abi_u256(T0 as u64 + 21 * 86_400));
    data.extend(batch_number);
    data.extend(reason);
    RawLogEntry {
        address: CONTRACT.into(),
        topics: vec![
            schema.fingerprint.clone(),
            topic_u64(batch_id),
            topic_address(0x55),
        ],
        data,
        block_number: block,
        log_index,
        tx_hash: format!("0x{block:064x}"),
    }
}
