//! The chain poller: a scheduled loop that keeps the event store fresh.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ── start() ──► Running ◄── pause()/resume() ──► Paused
//!                        │                                │
//!                        └──────────── stop() ────────────┴──► Stopped
//! ```
//!
//! `Stopped` is terminal and reachable from any state. Each tick computes a
//! scan window `[head - overlap, head]`, fetches the contract's logs for it,
//! decodes them, and commits the batch to the store in one call. A batch
//! fetched before `stop()` or `pause()` landed is discarded whole; a fetch
//! either fully decodes-and-inserts or inserts nothing.
//!
//! Tick failures are contained: a transport error or timeout is logged at
//! `warn!` and the same window is retried on the next scheduled tick. The
//! loop task is the store's sole writer and ticks never overlap.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

use medledger_core::{DecodeOutcome, LogDecoder, SchemaRegistry};

use crate::client::LedgerClient;
use crate::config::PollerConfig;
use crate::store::EventStore;

/// Runtime state of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Constructed but not started.
    Idle,
    /// Ticking and feeding the store.
    Running,
    /// Scheduler alive, fetches suppressed; the store stays queryable.
    Paused,
    /// Terminated.
    Stopped,
}

impl std::fmt::Display for PollerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Errors from poller lifecycle operations.
#[derive(Debug, Error)]
pub enum PollerError {
    #[error("poller already started (state: {state})")]
    AlreadyStarted { state: PollerState },
}

/// A polling loop bound to one ledger client and one store.
pub struct Poller<C: LedgerClient + 'static> {
    config: PollerConfig,
    client: Arc<C>,
    store: Arc<EventStore>,
    decoder: LogDecoder,
    state: watch::Sender<PollerState>,
    task: Option<JoinHandle<()>>,
}

impl<C: LedgerClient + 'static> Poller<C> {
    /// Create an idle poller. The store handle is shared: readers keep their
    /// own `Arc` and call `snapshot()` whenever they like.
    pub fn new(config: PollerConfig, client: Arc<C>, store: Arc<EventStore>) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            config,
            client,
            store,
            decoder: LogDecoder::new(Arc::new(SchemaRegistry::new())),
            state,
            task: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    /// Transition Idle → Running and begin the scheduled loop.
    /// The first tick fires immediately.
    pub fn start(&mut self) -> Result<(), PollerError> {
        let current = self.state();
        if current != PollerState::Idle {
            return Err(PollerError::AlreadyStarted { state: current });
        }
        self.state.send_replace(PollerState::Running);

        let client = Arc::clone(&self.client);
        let store = Arc::clone(&self.store);
        let decoder = self.decoder.clone();
        let config = self.config.clone();
        let state_rx = self.state.subscribe();

        info!(
            address = %config.contract_address,
            interval_ms = config.poll_interval.as_millis() as u64,
            overlap = config.overlap_blocks,
            "poller starting"
        );
        self.task = Some(tokio::spawn(run_loop(
            client, store, decoder, config, state_rx,
        )));
        Ok(())
    }

    /// Suppress fetching without losing scheduler state. No-op unless
    /// Running.
    pub fn pause(&self) {
        let changed = self.state.send_if_modified(|s| {
            if *s == PollerState::Running {
                *s = PollerState::Paused;
                true
            } else {
                false
            }
        });
        if changed {
            info!("poller paused");
        }
    }

    /// Resume ticking at the same interval. No duplicate immediate fetch:
    /// the next fetch happens on the next scheduled tick. No-op unless
    /// Paused.
    pub fn resume(&self) {
        let changed = self.state.send_if_modified(|s| {
            if *s == PollerState::Paused {
                *s = PollerState::Running;
                true
            } else {
                false
            }
        });
        if changed {
            info!("poller resumed");
        }
    }

    /// Cancel the scheduler. Effective before the next tick fires; an
    /// in-flight fetch completes but its batch is discarded. When this
    /// returns, no further insert can happen. Idempotent.
    pub async fn stop(&mut self) {
        self.state.send_replace(PollerState::Stopped);
        if let Some(task) = self.task.take() {
            if task.await.is_err() {
                warn!("poller task panicked during shutdown");
            }
        }
        info!("poller stopped");
    }
}

/// The loop task. Sole writer to the store.
async fn run_loop<C: LedgerClient>(
    client: Arc<C>,
    store: Arc<EventStore>,
    decoder: LogDecoder,
    config: PollerConfig,
    mut state_rx: watch::Receiver<PollerState>,
) {
    let mut ticker = interval(config.poll_interval);
    // A tick still running when the next is due means the next is skipped,
    // not queued.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let current_state = *state_rx.borrow();
                match current_state {
                    PollerState::Running => {
                        tick(&*client, &store, &decoder, &config, &state_rx).await;
                    }
                    PollerState::Paused => {
                        debug!("paused; skipping tick");
                    }
                    PollerState::Stopped => break,
                    PollerState::Idle => {}
                }
            }
            changed = state_rx.changed() => {
                if changed.is_err() || *state_rx.borrow() == PollerState::Stopped {
                    break;
                }
            }
        }
    }
    debug!("poller loop exited");
}

/// One scan: window → fetch → decode → commit.
async fn tick<C: LedgerClient>(
    client: &C,
    store: &EventStore,
    decoder: &LogDecoder,
    config: &PollerConfig,
    state_rx: &watch::Receiver<PollerState>,
) {
    let head = match timeout(config.fetch_timeout, client.current_head()).await {
        Ok(Ok(head)) => head,
        Ok(Err(e)) => {
            warn!(error = %e, "head fetch failed; retrying next tick");
            return;
        }
        Err(_) => {
            warn!("head fetch timed out; retrying next tick");
            return;
        }
    };

    let from = head.saturating_sub(config.overlap_blocks);
    let logs = match timeout(
        config.fetch_timeout,
        client.get_logs(&config.contract_address, from, head),
    )
    .await
    {
        Ok(Ok(logs)) => logs,
        Ok(Err(e)) => {
            warn!(error = %e, from, to = head, "log fetch failed; retrying next tick");
            return;
        }
        Err(_) => {
            warn!(from, to = head, "log fetch timed out; retrying next tick");
            return;
        }
    };

    let mut batch = Vec::with_capacity(logs.len());
    let mut skipped = 0usize;
    for entry in &logs {
        match decoder.decode(entry) {
            DecodeOutcome::Event(event) => batch.push(event),
            DecodeOutcome::Skip(reason) => {
                skipped += 1;
                debug!(
                    %reason,
                    block = entry.block_number,
                    log_index = entry.log_index,
                    "skipping log entry"
                );
            }
        }
    }

    // The state may have moved while the fetch was in flight. A batch
    // fetched before stop()/pause() landed is discarded whole.
    if *state_rx.borrow() != PollerState::Running {
        debug!(discarded = batch.len(), "state changed mid-tick; batch discarded");
        return;
    }

    let inserted = store.insert_batch(batch);
    debug!(from, to = head, inserted, skipped, "tick complete");
}
