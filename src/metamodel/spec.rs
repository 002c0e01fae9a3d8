//! Serde types for the meta-model document.
//!
//! This module defines the definition catalog (structures, enumerations,
//! type aliases, requests, notifications) and the recursive schema-node
//! grammar used in every type position. Decoding is deliberately strict:
//! unknown fields and unknown `kind` discriminators are errors, so upstream
//! schema drift surfaces as an immediate decode failure instead of silent
//! data loss.

use std::sync::OnceLock;

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde_json::{Map, Value};

/// The decoded meta-model document: flat collections of named definitions
/// plus document metadata.
///
/// Read-only once decoded; the only later mutation is the one-time
/// population of [`ReferenceNode::resolved`] cells during resolution.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Model {
    pub meta_data: MetaData,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub structures: Vec<Structure>,
    #[serde(default)]
    pub enumerations: Vec<Enumeration>,
    #[serde(default)]
    pub notifications: Vec<Request>,
    #[serde(default)]
    pub type_aliases: Vec<TypeAlias>,
}

/// Document metadata.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaData {
    /// Protocol version the document describes, e.g. `3.17.0`.
    pub version: String,
}

/// A named record definition with an ordered property list.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Structure {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Structures this one inherits from. Resolved but not flattened into
    /// the emitted record.
    #[serde(default)]
    pub extends: Vec<SchemaNode>,
    /// Structures mixed into this one. Resolved but not flattened.
    #[serde(default)]
    pub mixins: Vec<SchemaNode>,
    pub documentation: Option<String>,
    pub since: Option<String>,
    #[serde(default)]
    pub proposed: bool,
    pub deprecated: Option<String>,
    #[serde(default)]
    pub since_tags: Vec<String>,
}

/// One field of a structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Property {
    /// Wire identifier, preserved verbatim as the serialization tag.
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SchemaNode,
    #[serde(default)]
    pub optional: bool,
    pub documentation: Option<String>,
    pub since: Option<String>,
    #[serde(default)]
    pub proposed: bool,
    pub deprecated: Option<String>,
    #[serde(default)]
    pub since_tags: Vec<String>,
}

/// A named enumeration over literal values.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Enumeration {
    pub name: String,
    /// The underlying wire type of the enumeration values.
    #[serde(rename = "type")]
    pub ty: SchemaNode,
    /// Ordered literal values, kept as raw JSON.
    #[serde(default)]
    pub values: Vec<Value>,
    /// Whether values outside the enumerated set are allowed.
    #[serde(default)]
    pub supports_custom_values: bool,
    pub documentation: Option<String>,
    pub since: Option<String>,
    #[serde(default)]
    pub proposed: bool,
    pub deprecated: Option<String>,
    #[serde(default)]
    pub since_tags: Vec<String>,
}

/// A named alias for a schema node.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TypeAlias {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SchemaNode,
    pub documentation: Option<String>,
    pub since: Option<String>,
    #[serde(default)]
    pub proposed: bool,
    pub deprecated: Option<String>,
    #[serde(default)]
    pub since_tags: Vec<String>,
}

/// A request or notification definition. Notifications reuse this shape
/// with the response-side nodes absent.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Request {
    pub method: String,
    pub type_name: Option<String>,
    pub message_direction: MessageDirection,
    pub params: Option<SchemaNode>,
    pub result: Option<SchemaNode>,
    pub partial_result: Option<SchemaNode>,
    pub registration_options: Option<SchemaNode>,
    pub registration_method: Option<String>,
    pub error_data: Option<SchemaNode>,
    pub documentation: Option<String>,
    pub since: Option<String>,
    #[serde(default)]
    pub proposed: bool,
    pub deprecated: Option<String>,
    #[serde(default)]
    pub since_tags: Vec<String>,
}

/// Which side sends the message. The real document uses `both` for a
/// handful of messages, so it is accepted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageDirection {
    ClientToServer,
    ServerToClient,
    Both,
}

/// Handle to the definition a reference resolves to: an index into the
/// corresponding catalog collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedRef {
    Structure(usize),
    Enumeration(usize),
    TypeAlias(usize),
}

/// One node of the recursive type grammar: shared optional metadata plus a
/// kind-specific payload.
#[derive(Debug)]
pub struct SchemaNode {
    pub meta: NodeMeta,
    pub kind: SchemaKind,
}

/// Metadata shared by every schema node kind.
#[derive(Debug, Default)]
pub struct NodeMeta {
    pub since: Option<String>,
    pub proposed: bool,
    pub deprecated: Option<String>,
    pub documentation: Option<String>,
    pub since_tags: Vec<String>,
}

/// The closed set of schema node kinds, keyed on the wire by the `kind`
/// discriminator.
#[derive(Debug)]
pub enum SchemaKind {
    Base(BaseNode),
    Reference(ReferenceNode),
    Array(ArrayNode),
    Map(MapNode),
    Or(SequenceNode),
    And(SequenceNode),
    Tuple(SequenceNode),
    StringLiteral(StringLiteralNode),
    Literal(LiteralNode),
}

/// A primitive type name (`string`, `integer`, `URI`, …).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseNode {
    pub name: String,
}

/// A symbolic reference to a named definition.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceNode {
    pub name: String,
    /// Populated once by resolution, never invalidated or re-resolved.
    #[serde(skip)]
    pub resolved: OnceLock<ResolvedRef>,
}

/// An array with one element type.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrayNode {
    pub element: Box<SchemaNode>,
}

/// A map from a key type to a value type.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapNode {
    pub key: Box<SchemaNode>,
    pub value: Box<SchemaNode>,
}

/// An ordered sequence of nodes, shared by the `or`, `and`, and `tuple`
/// kinds.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequenceNode {
    pub items: Vec<SchemaNode>,
}

/// A constant string value.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringLiteralNode {
    pub value: String,
}

/// A literal with an unconstrained payload, observed in practice as an
/// empty property list.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiteralNode {
    pub value: Value,
}

impl SchemaNode {
    /// The discriminator value of this node, as it appears on the wire.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::Base(_) => "base",
            SchemaKind::Reference(_) => "reference",
            SchemaKind::Array(_) => "array",
            SchemaKind::Map(_) => "map",
            SchemaKind::Or(_) => "or",
            SchemaKind::And(_) => "and",
            SchemaKind::Tuple(_) => "tuple",
            SchemaKind::StringLiteral(_) => "stringLiteral",
            SchemaKind::Literal(_) => "literal",
        }
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    /// Dispatches on the `kind` discriminator, then strictly decodes the
    /// remaining fields into the selected variant payload. Unknown kinds,
    /// unknown fields, and mis-typed fields fail with an error naming the
    /// offending variant.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = match Value::deserialize(deserializer)? {
            Value::Object(fields) => fields,
            _ => return Err(D::Error::custom("schema node must be a JSON object")),
        };

        let kind = match fields.remove("kind") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err(D::Error::custom("schema node `kind` must be a string")),
            None => return Err(D::Error::custom("schema node is missing `kind`")),
        };
        let meta = take_meta(&mut fields).map_err(D::Error::custom)?;
        let rest = Value::Object(fields);

        let kind = match kind.as_str() {
            "base" => SchemaKind::Base(decode_payload(&kind, rest)?),
            "reference" => SchemaKind::Reference(decode_payload(&kind, rest)?),
            "array" => SchemaKind::Array(decode_payload(&kind, rest)?),
            "map" => SchemaKind::Map(decode_payload(&kind, rest)?),
            "or" => SchemaKind::Or(decode_payload(&kind, rest)?),
            "and" => SchemaKind::And(decode_payload(&kind, rest)?),
            "tuple" => SchemaKind::Tuple(decode_payload(&kind, rest)?),
            "stringLiteral" => SchemaKind::StringLiteral(decode_payload(&kind, rest)?),
            "literal" => SchemaKind::Literal(decode_payload(&kind, rest)?),
            other => {
                return Err(D::Error::custom(format!(
                    "unknown schema node kind `{other}`"
                )));
            }
        };

        Ok(SchemaNode { meta, kind })
    }
}

/// Strictly decodes the leftover fields into a variant payload, attributing
/// any failure to the variant.
fn decode_payload<T, E>(kind: &str, fields: Value) -> Result<T, E>
where
    T: DeserializeOwned,
    E: serde::de::Error,
{
    serde_json::from_value(fields)
        .map_err(|err| E::custom(format!("schema node kind `{kind}`: {err}")))
}

/// Pops the shared metadata fields out of the node's field map so the
/// per-kind payloads stay strict about what remains.
fn take_meta(fields: &mut Map<String, Value>) -> Result<NodeMeta, String> {
    Ok(NodeMeta {
        since: take_field(fields, "since")?,
        proposed: take_field(fields, "proposed")?.unwrap_or(false),
        deprecated: take_field(fields, "deprecated")?,
        documentation: take_field(fields, "documentation")?,
        since_tags: take_field(fields, "sinceTags")?.unwrap_or_default(),
    })
}

fn take_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, String> {
    match fields.remove(key) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|err| format!("invalid schema node `{key}`: {err}")),
    }
}
