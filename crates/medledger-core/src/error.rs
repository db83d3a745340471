//! Error types for the decode path.

use thiserror::Error;

/// Failures while decoding the fields of a single log entry.
///
/// These never escape the decoder as errors: the decoder folds them into
/// `DecodeOutcome::Skip(SkipReason::Malformed)` so one bad entry can never
/// abort a batch. They exist as a typed enum so tests and the `Skip` reason
/// can say what went wrong.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid topic hex: {reason}")]
    InvalidTopicHex { reason: String },

    #[error("ABI decode failed: {reason}")]
    AbiDecodeFailed { reason: String },

    #[error("type mismatch for field '{field}': expected {expected}")]
    TypeMismatch { field: String, expected: String },

    #[error("missing topic for indexed field '{field}'")]
    MissingTopic { field: String },
}
