//! Poller configuration and builder.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a poller instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Ledger contract address whose logs are fetched.
    pub contract_address: String,
    /// How often a tick fires.
    pub poll_interval: Duration,
    /// How many blocks behind the head each scan window starts. Blocks are
    /// deliberately re-scanned across ticks; the store's id-based dedup
    /// absorbs the overlap.
    pub overlap_blocks: u64,
    /// Upper bound on each network call within a tick. Must stay below
    /// `poll_interval` so ticks cannot pile up.
    pub fetch_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            poll_interval: Duration::from_secs(3),
            overlap_blocks: 10,
            fetch_timeout: Duration::from_secs(2),
        }
    }
}

/// Fluent builder for `PollerConfig`.
///
/// # Example
///
/// ```rust
/// use medledger_feed::PollerBuilder;
/// use std::time::Duration;
///
/// let config = PollerBuilder::new()
///     .contract_address("0x5FbDB2315678afecb367f032d93F642f64180aa3")
///     .poll_interval(Duration::from_secs(3))
///     .overlap_blocks(10)
///     .build_config();
/// ```
#[derive(Default)]
pub struct PollerBuilder {
    config: PollerConfig,
}

impl PollerBuilder {
    pub fn new() -> Self {
        Self {
            config: PollerConfig::default(),
        }
    }

    /// Set the contract address to watch.
    pub fn contract_address(mut self, address: impl Into<String>) -> Self {
        self.config.contract_address = address.into();
        self
    }

    /// Set the tick interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the scan-window overlap in blocks.
    pub fn overlap_blocks(mut self, blocks: u64) -> Self {
        self.config.overlap_blocks = blocks;
        self
    }

    /// Set the per-call fetch timeout.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Build the `PollerConfig`.
    pub fn build_config(self) -> PollerConfig {
        self.config
    }
}
