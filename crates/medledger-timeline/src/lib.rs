//! # medledger-timeline
//!
//! Best-effort reconstruction of a medicine batch's lifecycle from its
//! current on-ledger snapshot.
//!
//! # Approximation policy
//!
//! The ledger collaborator exposes only point-in-time batch state, not
//! per-event history (there is no indexing service). This crate therefore
//! *synthesizes* a timeline: the `Created` entry is anchored at the batch's
//! recorded manufacture time, and every subsequent entry (`Dispensed`,
//! `Flagged`, `Recalled`) is placed at a fixed configured offset after it.
//! Those offsets are configuration constants, not measurements, and every
//! synthesized entry carries `approximate: true` so consumers can tell a
//! guessed timestamp from a recorded one structurally.
//!
//! A deployment with a real indexer would replace this crate's data source
//! with genuine historical event lookups without changing `TimelineEntry`.

pub mod reconstruct;
pub mod snapshot;

pub use reconstruct::{reconstruct, ApproxOffsets, TimelineDetails, TimelineEntry, TimelineKind};
pub use snapshot::{BatchSnapshot, BatchStatus};
