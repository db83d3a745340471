//! # medledger-core
//!
//! Event schemas, the log decoder, and the typed event model for the
//! MedLedger pipeline. Everything in this crate is synchronous and pure:
//! the poller and store live in `medledger-feed`.

pub mod decode;
pub mod entry;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod schema;

pub use decode::{DecodeOutcome, LogDecoder, SkipReason};
pub use entry::RawLogEntry;
pub use error::DecodeError;
pub use event::{DecodedEvent, EventDomain, EventId, EventKind, FieldValue};
pub use schema::{EventSchema, FieldDef, FieldType, SchemaRegistry};
