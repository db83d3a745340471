//! # medledger-feed
//!
//! The live side of MedLedger: a bounded in-memory event feed kept fresh by
//! a polling loop.
//!
//! # Architecture
//!
//! ```text
//! Poller (scheduled loop, sole writer)
//!    ├── LedgerClient   (current_head / get_logs / get_batch_snapshot)
//!    ├── LogDecoder     (medledger-core, trial-match against the registry)
//!    └── EventStore     (bounded, deduplicated, newest-first buffer)
//!                            ▲
//!         readers: snapshot() + filter_events()  (any number, any time)
//! ```
//!
//! The poller deliberately re-scans an overlap of recent blocks each tick so
//! a slow tick or a brief pause never leaves a gap; the store's id-based
//! dedup absorbs the overlap for free.

pub mod client;
pub mod config;
pub mod filter;
pub mod network;
pub mod poller;
pub mod store;

pub use client::{LedgerClient, LedgerError};
pub use config::{PollerBuilder, PollerConfig};
pub use filter::{filter_events, FeedFilter};
pub use network::Network;
pub use poller::{Poller, PollerError, PollerState};
pub use store::EventStore;
