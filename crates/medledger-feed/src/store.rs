//! Bounded, deduplicated in-memory event buffer.

use std::collections::VecDeque;
use std::sync::Mutex;

use medledger_core::DecodedEvent;

/// Default buffer capacity, matching the feed's display window.
pub const DEFAULT_CAPACITY: usize = 50;

/// Newest-first buffer of decoded events with a hard capacity.
///
/// The poller task is the sole writer; readers take owned snapshots and can
/// never observe a partially-applied batch. Eviction past capacity is
/// silent: the feed is a window, not an archive.
pub struct EventStore {
    capacity: usize,
    buffer: Mutex<VecDeque<DecodedEvent>>,
}

impl EventStore {
    /// Create a store holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Insert a single event. A duplicate id is a silent no-op.
    /// Returns `true` if the event was inserted.
    pub fn insert(&self, event: DecodedEvent) -> bool {
        self.insert_batch(vec![event]) == 1
    }

    /// Insert a batch of events in fetch order (oldest first), atomically
    /// with respect to readers: one lock, all-or-nothing visibility.
    ///
    /// Each new event is prepended, so after the call the batch sits at the
    /// front of the buffer newest-first and the relative order within the
    /// batch is preserved. Returns the number of events actually inserted
    /// (duplicates are dropped, then the tail is truncated to capacity).
    pub fn insert_batch(&self, events: Vec<DecodedEvent>) -> usize {
        let mut buffer = self.buffer.lock().unwrap();
        let mut inserted = 0;
        for event in events {
            if buffer.iter().any(|e| e.id == event.id) {
                continue;
            }
            buffer.push_front(event);
            inserted += 1;
        }
        buffer.truncate(self.capacity);
        inserted
    }

    /// An owned copy of the buffer, newest first. Never exposes the live
    /// buffer, so readers cannot observe a torn state during insertion.
    pub fn snapshot(&self) -> Vec<DecodedEvent> {
        self.buffer.lock().unwrap().iter().cloned().collect()
    }

    /// Empty the buffer. Used only on explicit reset, e.g. reconnecting to
    /// a different ledger instance.
    pub fn clear(&self) {
        self.buffer.lock().unwrap().clear();
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured capacity N.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
