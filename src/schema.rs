//! Schema model and its structural descriptor.
//!
//! A schema is pure data: a primitive type tag, a literal, an object of named
//! fields, or a union of alternatives. Schemas serialize to (and parse from)
//! the descriptor convention echoed inside explanations:
//!
//! | Schema | Descriptor |
//! |--------|------------|
//! | primitive | `"string"` |
//! | literal | `{ "literal": V }` |
//! | object | `{ "object": { "field": <descriptor>, "opt?": <descriptor> } }` |
//! | union | `{ "oneOf": [<descriptor>, ...] }` |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map};

use crate::error::SchemaError;
use crate::value::Value;

/// Suffix marking an object field as optional.
pub const OPTIONAL_MARKER: char = '?';

/// Primitive type tags, matched against the value's `typeof`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Undefined,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Undefined => "undefined",
        }
    }

    /// Returns `None` for unknown names (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(PrimitiveKind::String),
            "number" => Some(PrimitiveKind::Number),
            "boolean" => Some(PrimitiveKind::Boolean),
            "undefined" => Some(PrimitiveKind::Undefined),
            _ => None,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        value.type_of() == self.as_str()
    }
}

/// A named member of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key with the optional marker stripped.
    pub key: String,
    pub optional: bool,
    pub schema: Schema,
}

impl Field {
    /// Parse a declared field name, stripping a trailing optional marker.
    pub fn new(name: &str, schema: Schema) -> Self {
        match name.strip_suffix(OPTIONAL_MARKER) {
            Some(key) => Self::optional(key, schema),
            None => Self::required(name, schema),
        }
    }

    pub fn required(key: impl Into<String>, schema: Schema) -> Self {
        Self {
            key: key.into(),
            optional: false,
            schema,
        }
    }

    pub fn optional(key: impl Into<String>, schema: Schema) -> Self {
        Self {
            key: key.into(),
            optional: true,
            schema,
        }
    }

    /// The declared name, optional marker included.
    pub fn declared_name(&self) -> String {
        if self.optional {
            format!("{}{}", self.key, OPTIONAL_MARKER)
        } else {
            self.key.clone()
        }
    }
}

/// Declarative description of an expected value shape.
///
/// Immutable once built and freely shared between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "serde_json::Value", try_from = "serde_json::Value")]
pub enum Schema {
    Primitive(PrimitiveKind),
    Literal(Value),
    /// Fields in declaration order.
    Object(Vec<Field>),
    /// Alternatives in declaration order.
    OneOf(Vec<Schema>),
}

impl Schema {
    pub fn string() -> Self {
        Schema::Primitive(PrimitiveKind::String)
    }

    pub fn number() -> Self {
        Schema::Primitive(PrimitiveKind::Number)
    }

    pub fn boolean() -> Self {
        Schema::Primitive(PrimitiveKind::Boolean)
    }

    pub fn undefined() -> Self {
        Schema::Primitive(PrimitiveKind::Undefined)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Schema::Literal(value.into())
    }

    /// Build an object schema from declared names; a trailing `?` marks a field optional.
    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Schema)>) -> Self {
        Schema::Object(
            fields
                .into_iter()
                .map(|(name, schema)| Field::new(name, schema))
                .collect(),
        )
    }

    pub fn one_of(alternatives: impl IntoIterator<Item = Schema>) -> Self {
        Schema::OneOf(alternatives.into_iter().collect())
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Primitive(kind) => kind.as_str(),
            Schema::Literal(_) => "literal",
            Schema::Object(_) => "object",
            Schema::OneOf(_) => "oneOf",
        }
    }

    /// Structural echo of this schema.
    pub fn descriptor(&self) -> serde_json::Value {
        match self {
            Schema::Primitive(kind) => json!(kind.as_str()),
            Schema::Literal(value) => json!({ "literal": value }),
            Schema::Object(fields) => {
                let members: Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|f| (f.declared_name(), f.schema.descriptor()))
                    .collect();
                json!({ "object": members })
            }
            Schema::OneOf(alternatives) => {
                let alternatives: Vec<_> = alternatives.iter().map(Schema::descriptor).collect();
                json!({ "oneOf": alternatives })
            }
        }
    }

    /// Parse a schema from its descriptor.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` naming the JSON Pointer of the offending node.
    pub fn from_descriptor(descriptor: &serde_json::Value) -> Result<Self, SchemaError> {
        parse_descriptor(descriptor, "")
    }
}

impl From<Schema> for serde_json::Value {
    fn from(schema: Schema) -> Self {
        schema.descriptor()
    }
}

impl TryFrom<serde_json::Value> for Schema {
    type Error = SchemaError;

    fn try_from(descriptor: serde_json::Value) -> Result<Self, Self::Error> {
        Schema::from_descriptor(&descriptor)
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// --- Internal implementation ---

fn parse_descriptor(descriptor: &serde_json::Value, path: &str) -> Result<Schema, SchemaError> {
    match descriptor {
        serde_json::Value::String(name) => PrimitiveKind::parse(name)
            .map(Schema::Primitive)
            .ok_or_else(|| SchemaError::UnknownPrimitive {
                path: path.to_string(),
                name: name.clone(),
            }),
        serde_json::Value::Object(map) => {
            let mut keys = map.keys();
            match (keys.next().map(String::as_str), keys.next()) {
                (Some("literal"), None) => parse_literal(&map["literal"], &format!("{}/literal", path)),
                (Some("object"), None) => parse_fields(&map["object"], &format!("{}/object", path)),
                (Some("oneOf"), None) => parse_one_of(&map["oneOf"], &format!("{}/oneOf", path)),
                _ => Err(SchemaError::UnknownForm {
                    path: path.to_string(),
                    keys: map.keys().cloned().collect(),
                }),
            }
        }
        other => Err(SchemaError::InvalidDescriptor {
            path: path.to_string(),
            actual: json_type_name(other).to_string(),
        }),
    }
}

fn parse_literal(value: &serde_json::Value, path: &str) -> Result<Schema, SchemaError> {
    match value {
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(SchemaError::NonPrimitiveLiteral {
                path: path.to_string(),
                actual: json_type_name(value).to_string(),
            })
        }
        primitive => Ok(Schema::Literal(Value::from(primitive.clone()))),
    }
}

fn parse_fields(value: &serde_json::Value, path: &str) -> Result<Schema, SchemaError> {
    let Some(members) = value.as_object() else {
        return Err(SchemaError::InvalidFields {
            path: path.to_string(),
            actual: json_type_name(value).to_string(),
        });
    };

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(members.len());
    for (name, member) in members {
        // JSON Pointer encoding (~ = ~0, / = ~1)
        let field_path = format!("{}/{}", path, name.replace('~', "~0").replace('/', "~1"));
        let schema = parse_descriptor(member, &field_path)?;
        let field = Field::new(name, schema);
        if !seen.insert(field.key.clone()) {
            return Err(SchemaError::DuplicateField {
                path: path.to_string(),
                key: field.key,
            });
        }
        fields.push(field);
    }
    Ok(Schema::Object(fields))
}

fn parse_one_of(value: &serde_json::Value, path: &str) -> Result<Schema, SchemaError> {
    let alternatives = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(SchemaError::EmptyOneOf {
                path: path.to_string(),
            })
        }
    };

    alternatives
        .iter()
        .enumerate()
        .map(|(i, alt)| parse_descriptor(alt, &format!("{}/{}", path, i)))
        .collect::<Result<Vec<_>, _>>()
        .map(Schema::OneOf)
}
