//! The log decoder: raw entry in, typed event or explicit skip out.
//!
//! Decoding is a trial match against the schema registry: topics[0] selects
//! the candidate schema, the topic count must agree with the schema's
//! indexed-field count, and only then are the fields ABI-decoded. Every
//! failure mode is a `Skip`, not an error; logs from other contract
//! revisions or unrelated instructions are an expected input, and a single
//! malformed entry never drops the rest of a batch.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use chrono::Utc;
use indexmap::IndexMap;
use std::sync::Arc;

use crate::entry::RawLogEntry;
use crate::error::DecodeError;
use crate::event::{DecodedEvent, EventId, FieldValue};
use crate::fingerprint;
use crate::schema::{EventSchema, FieldType, SchemaRegistry};

/// Why an entry was skipped rather than decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry has no topics at all, or topics[0] is not a 32-byte value.
    MissingTopic0,
    /// topics[0] matches none of the registered signatures.
    UnknownSignature,
    /// A known signature but the wrong number of topics for its layout.
    TopicArity,
    /// Fields present but unparsable (bad hex, short data, type mismatch).
    Malformed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingTopic0 => write!(f, "missing or malformed topics[0]"),
            SkipReason::UnknownSignature => write!(f, "unknown event signature"),
            SkipReason::TopicArity => write!(f, "topic count does not match schema"),
            SkipReason::Malformed(reason) => write!(f, "malformed payload: {reason}"),
        }
    }
}

/// The outcome of decoding one raw entry. `Skip` is a normal branch, not an
/// error condition.
#[derive(Debug)]
pub enum DecodeOutcome {
    Event(DecodedEvent),
    Skip(SkipReason),
}

impl DecodeOutcome {
    /// The decoded event, if any.
    pub fn into_event(self) -> Option<DecodedEvent> {
        match self {
            DecodeOutcome::Event(e) => Some(e),
            DecodeOutcome::Skip(_) => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, DecodeOutcome::Skip(_))
    }
}

/// Decodes raw log entries against the static schema registry.
/// Pure: no side effects, no interior state beyond the shared registry.
#[derive(Clone)]
pub struct LogDecoder {
    registry: Arc<SchemaRegistry>,
}

impl LogDecoder {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Decode a single raw entry.
    pub fn decode(&self, entry: &RawLogEntry) -> DecodeOutcome {
        let topic0 = match fingerprint::from_topics(&entry.topics) {
            Some(t) => t,
            None => return DecodeOutcome::Skip(SkipReason::MissingTopic0),
        };

        let schema = match self.registry.lookup(topic0) {
            Some(s) => s,
            None => return DecodeOutcome::Skip(SkipReason::UnknownSignature),
        };

        if entry.topics.len() != schema.expected_topic_count() {
            return DecodeOutcome::Skip(SkipReason::TopicArity);
        }

        match self.decode_fields(entry, schema) {
            Ok(args) => DecodeOutcome::Event(DecodedEvent {
                id: EventId::new(entry.block_number, entry.log_index),
                kind: schema.kind,
                block_number: entry.block_number,
                log_index: entry.log_index,
                tx_hash: entry.tx_hash.clone(),
                args,
                observed_at: Utc::now(),
            }),
            Err(e) => DecodeOutcome::Skip(SkipReason::Malformed(e.to_string())),
        }
    }

    /// Decode indexed topics and the data tuple, merging the results back
    /// into schema declaration order.
    fn decode_fields(
        &self,
        entry: &RawLogEntry,
        schema: &EventSchema,
    ) -> Result<IndexMap<String, FieldValue>, DecodeError> {
        let mut indexed = Vec::new();
        for (i, field) in schema.indexed_fields().into_iter().enumerate() {
            // topics[0] is the signature hash; indexed params start at 1.
            let topic = entry
                .topics
                .get(i + 1)
                .ok_or_else(|| DecodeError::MissingTopic {
                    field: field.name.to_string(),
                })?;
            indexed.push(decode_topic(topic, field.ty, field.name)?);
        }

        let data_fields = schema.data_fields();
        let mut data_values = Vec::with_capacity(data_fields.len());
        if !data_fields.is_empty() {
            let tuple = DynSolType::Tuple(
                data_fields.iter().map(|f| field_to_dyn(f.ty)).collect(),
            );
            let decoded = tuple
                .abi_decode(&entry.data)
                .map_err(|e| DecodeError::AbiDecodeFailed {
                    reason: e.to_string(),
                })?;
            let values = match decoded {
                DynSolValue::Tuple(vals) => vals,
                other => vec![other],
            };
            for (field, value) in data_fields.iter().zip(values) {
                data_values.push(normalize(value, field.ty, field.name)?);
            }
        }

        // Re-interleave into declaration order.
        let mut indexed_iter = indexed.into_iter();
        let mut data_iter = data_values.into_iter();
        let mut args = IndexMap::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let value = if field.indexed {
                indexed_iter.next()
            } else {
                data_iter.next()
            };
            // Both iterators were built field-for-field above.
            if let Some(v) = value {
                args.insert(field.name.to_string(), v);
            }
        }
        Ok(args)
    }
}

/// Map a schema field type onto the ABI decoder's type system.
fn field_to_dyn(ty: FieldType) -> DynSolType {
    match ty {
        FieldType::Uint(bits) => DynSolType::Uint(bits as usize),
        FieldType::Address => DynSolType::Address,
        FieldType::Str => DynSolType::String,
    }
}

/// Decode a single indexed topic (a 32-byte ABI-encoded value).
///
/// All indexed fields in the registry are value types (uint, address), so
/// the original value is recoverable directly from the topic bytes.
fn decode_topic(topic: &str, ty: FieldType, name: &str) -> Result<FieldValue, DecodeError> {
    let hex_str = topic.strip_prefix("0x").unwrap_or(topic);
    let bytes = hex::decode(hex_str).map_err(|e| DecodeError::InvalidTopicHex {
        reason: e.to_string(),
    })?;
    let value = field_to_dyn(ty)
        .abi_decode(&bytes)
        .map_err(|e| DecodeError::AbiDecodeFailed {
            reason: format!("topic '{name}': {e}"),
        })?;
    normalize(value, ty, name)
}

/// Normalize an ABI value into the crate's field value model.
fn normalize(value: DynSolValue, ty: FieldType, name: &str) -> Result<FieldValue, DecodeError> {
    match value {
        DynSolValue::Uint(v, _) => Ok(match u128::try_from(v) {
            Ok(small) => FieldValue::Uint(small),
            Err(_) => FieldValue::BigUint(v.to_string()),
        }),
        DynSolValue::Address(a) => Ok(FieldValue::Address(a.to_checksum(None))),
        DynSolValue::String(s) => Ok(FieldValue::Str(s)),
        _ => Err(DecodeError::TypeMismatch {
            field: name.to_string(),
            expected: ty.abi_name(),
        }),
    }
}
