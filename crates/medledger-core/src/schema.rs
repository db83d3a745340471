//! Event schemas and the static schema registry.
//!
//! The registry holds the closed set of twelve event layouts the ledger
//! contract emits. It is built once at startup and never mutated; adding a
//! schema is a deploy-time change, not a runtime one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::event::EventKind;
use crate::fingerprint;

/// Canonical field types appearing in the ledger's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Unsigned integer, width in bits (uint8 .. uint256).
    Uint(u16),
    /// 20-byte address.
    Address,
    /// UTF-8 string.
    Str,
}

impl FieldType {
    /// The type's name in a canonical ABI signature.
    pub fn abi_name(&self) -> String {
        match self {
            FieldType::Uint(bits) => format!("uint{bits}"),
            FieldType::Address => "address".into(),
            FieldType::Str => "string".into(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abi_name())
    }
}

/// Definition of a single field within a schema.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    /// Field name, as it appears in decoded args.
    pub name: &'static str,
    /// Canonical type.
    pub ty: FieldType,
    /// Whether the field is carried in an indexed topic (true) or in the
    /// ABI-encoded data payload (false).
    pub indexed: bool,
}

impl FieldDef {
    const fn new(name: &'static str, ty: FieldType, indexed: bool) -> Self {
        Self { name, ty, indexed }
    }
}

/// A named, typed field layout describing how to interpret a raw log entry.
#[derive(Debug, Clone, Serialize)]
pub struct EventSchema {
    /// The event kind this schema decodes into.
    pub kind: EventKind,
    /// Canonical ABI signature, e.g. `"UserVerified(address,address,uint256)"`.
    pub signature: String,
    /// keccak256 of `signature`, matched against topics[0].
    pub fingerprint: String,
    /// Ordered field definitions (order matters for ABI decode).
    pub fields: Vec<FieldDef>,
}

impl EventSchema {
    fn new(kind: EventKind, event_name: &str, fields: Vec<FieldDef>) -> Self {
        let types: Vec<String> = fields.iter().map(|f| f.ty.abi_name()).collect();
        let signature = format!("{}({})", event_name, types.join(","));
        let fingerprint = fingerprint::keccak256_signature(&signature);
        Self {
            kind,
            signature,
            fingerprint,
            fields,
        }
    }

    /// Fields carried in topics[1..], in declaration order.
    pub fn indexed_fields(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| f.indexed).collect()
    }

    /// Fields carried in the data payload, in declaration order.
    pub fn data_fields(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| !f.indexed).collect()
    }

    /// Expected topic count for a matching entry: topics[0] plus one topic
    /// per indexed field.
    pub fn expected_topic_count(&self) -> usize {
        1 + self.fields.iter().filter(|f| f.indexed).count()
    }
}

/// Static table of the twelve known event layouts, keyed by fingerprint.
/// Read-only after construction; cheap to share behind an `Arc`.
pub struct SchemaRegistry {
    schemas: Vec<EventSchema>,
    by_fingerprint: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Build the registry. Deterministic; fingerprints are computed here,
    /// once per process.
    pub fn new() -> Self {
        use EventKind::*;
        use FieldType::{Address, Str, Uint};

        let schemas = vec![
            EventSchema::new(
                PrescriptionCreated,
                "PrescriptionCreated",
                vec![
                    FieldDef::new("id", Uint(256), true),
                    FieldDef::new("patientHash", Str, false),
                    FieldDef::new("doctor", Address, true),
                    FieldDef::new("expiresAt", Uint(256), false),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                PrescriptionDispensed,
                "PrescriptionDispensed",
                vec![
                    FieldDef::new("id", Uint(256), true),
                    FieldDef::new("pharmacist", Address, true),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                PrescriptionUpdated,
                "PrescriptionUpdated",
                vec![
                    FieldDef::new("id", Uint(256), true),
                    FieldDef::new("version", Uint(256), false),
                    FieldDef::new("doctor", Address, true),
                    FieldDef::new("reason", Str, false),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                PrescriptionRevoked,
                "PrescriptionRevoked",
                vec![
                    FieldDef::new("id", Uint(256), true),
                    FieldDef::new("revokedBy", Address, true),
                    FieldDef::new("reason", Str, false),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                BatchCreated,
                "BatchCreated",
                vec![
                    FieldDef::new("id", Uint(256), true),
                    FieldDef::new("batchNumber", Str, false),
                    FieldDef::new("medicineName", Str, false),
                    FieldDef::new("manufacturer", Address, true),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                BatchDispensed,
                "BatchDispensed",
                vec![
                    FieldDef::new("batchId", Uint(256), true),
                    FieldDef::new("batchNumber", Str, false),
                    FieldDef::new("quantity", Uint(256), false),
                    FieldDef::new("remainingUnits", Uint(256), false),
                    FieldDef::new("dispensedBy", Address, true),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                BatchRecalled,
                "BatchRecalled",
                vec![
                    FieldDef::new("id", Uint(256), true),
                    FieldDef::new("batchNumber", Str, false),
                    FieldDef::new("reason", Str, false),
                    FieldDef::new("recalledBy", Address, true),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                BatchFlagged,
                "BatchFlagged",
                vec![
                    FieldDef::new("id", Uint(256), true),
                    FieldDef::new("batchNumber", Str, false),
                    FieldDef::new("reason", Str, false),
                    FieldDef::new("flaggedBy", Address, true),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                FakeMedicineAlert,
                "FakeMedicineAlert",
                vec![
                    FieldDef::new("batchId", Uint(256), true),
                    FieldDef::new("batchNumber", Str, false),
                    FieldDef::new("alertType", Str, false),
                    FieldDef::new("reportedBy", Address, true),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                UserRegistered,
                "UserRegistered",
                vec![
                    FieldDef::new("user", Address, true),
                    FieldDef::new("role", Uint(8), false),
                    FieldDef::new("name", Str, false),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                UserVerified,
                "UserVerified",
                vec![
                    FieldDef::new("user", Address, true),
                    FieldDef::new("verifiedBy", Address, true),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
            EventSchema::new(
                UserDeactivated,
                "UserDeactivated",
                vec![
                    FieldDef::new("user", Address, true),
                    FieldDef::new("deactivatedBy", Address, true),
                    FieldDef::new("timestamp", Uint(256), false),
                ],
            ),
        ];

        let by_fingerprint = schemas
            .iter()
            .enumerate()
            .map(|(i, s)| (s.fingerprint.clone(), i))
            .collect();

        Self {
            schemas,
            by_fingerprint,
        }
    }

    /// Look up a schema by its topics[0] fingerprint. Case-insensitive on
    /// the hex digits, since providers differ in casing.
    pub fn lookup(&self, topic0: &str) -> Option<&EventSchema> {
        let normalized = topic0.to_ascii_lowercase();
        self.by_fingerprint
            .get(&normalized)
            .map(|&i| &self.schemas[i])
    }

    /// Look up the schema for a given event kind.
    pub fn lookup_kind(&self, kind: EventKind) -> Option<&EventSchema> {
        self.schemas.iter().find(|s| s.kind == kind)
    }

    /// All schemas, in registry order.
    pub fn schemas(&self) -> &[EventSchema] {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_twelve_schemas() {
        let reg = SchemaRegistry::new();
        assert_eq!(reg.len(), 12);
    }

    #[test]
    fn fingerprints_are_32_byte_hex() {
        let reg = SchemaRegistry::new();
        for schema in reg.schemas() {
            assert!(schema.fingerprint.starts_with("0x"));
            assert_eq!(schema.fingerprint.len(), 66, "{}", schema.signature);
        }
    }

    #[test]
    fn lookup_by_known_fingerprint() {
        let reg = SchemaRegistry::new();
        // keccak256("BatchDispensed(uint256,string,uint256,uint256,address,uint256)")
        let schema = reg
            .lookup("0x70066670106fa2a2ffa75ccef7c60b0b99786f438e57d0de224979c55bb89c3a")
            .expect("BatchDispensed fingerprint should resolve");
        assert_eq!(schema.kind, EventKind::BatchDispensed);
        assert_eq!(schema.expected_topic_count(), 3); // sig + batchId + dispensedBy
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = SchemaRegistry::new();
        let schema = reg
            .lookup("0x70066670106FA2A2FFA75CCEF7C60B0B99786F438E57D0DE224979C55BB89C3A")
            .expect("uppercase hex should resolve");
        assert_eq!(schema.kind, EventKind::BatchDispensed);
    }

    #[test]
    fn lookup_unknown_returns_none() {
        let reg = SchemaRegistry::new();
        assert!(reg.lookup("0xdeadbeef").is_none());
    }

    #[test]
    fn signatures_have_no_spaces() {
        let reg = SchemaRegistry::new();
        for schema in reg.schemas() {
            assert!(!schema.signature.contains(' '), "{}", schema.signature);
        }
    }

    #[test]
    fn every_kind_has_a_schema() {
        let reg = SchemaRegistry::new();
        for kind in EventKind::ALL {
            assert!(reg.lookup_kind(kind).is_some(), "{kind:?}");
        }
    }

    #[test]
    fn user_registered_layout() {
        let reg = SchemaRegistry::new();
        let schema = reg.lookup_kind(EventKind::UserRegistered).unwrap();
        assert_eq!(
            schema.signature,
            "UserRegistered(address,uint8,string,uint256)"
        );
        assert_eq!(schema.indexed_fields().len(), 1);
        assert_eq!(schema.data_fields().len(), 3);
    }
}
