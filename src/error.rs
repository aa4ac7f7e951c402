//! Error types for coercion, schema parsing and loading.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::value::Value;

/// Ordered field names leading from the schema root to a failure.
pub type KeyPath = Vec<String>;

/// Why a value does not conform to a schema.
///
/// The variants form a tree mirroring the schema: `AtKey` locates a leaf
/// `InvalidType`, `Joint` collects one cause per union alternative.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CoercionError {
    #[error("expected {expected}, got {actual}")]
    InvalidType { expected: String, actual: Value },

    #[error("{}: missing required key", path.join("."))]
    MissingKey { path: KeyPath },

    #[error("{}: {cause}", path.join("."))]
    AtKey {
        path: KeyPath,
        cause: Box<CoercionError>,
    },

    #[error("no alternative matched ({})", join_causes(causes))]
    Joint { causes: Vec<CoercionError> },
}

impl CoercionError {
    pub fn invalid_type(expected: impl Into<String>, actual: Value) -> Self {
        Self::InvalidType {
            expected: expected.into(),
            actual,
        }
    }

    pub fn missing_key<K: Into<String>>(path: impl IntoIterator<Item = K>) -> Self {
        Self::MissingKey {
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    pub fn at_key<K: Into<String>>(path: impl IntoIterator<Item = K>, cause: CoercionError) -> Self {
        Self::AtKey {
            path: path.into_iter().map(Into::into).collect(),
            cause: Box::new(cause),
        }
    }

    pub fn joint(causes: Vec<CoercionError>) -> Self {
        Self::Joint { causes }
    }

    /// The path this error is located at, empty for root-level errors.
    pub fn path(&self) -> &[String] {
        match self {
            Self::MissingKey { path } | Self::AtKey { path, .. } => path,
            Self::InvalidType { .. } | Self::Joint { .. } => &[],
        }
    }
}

fn join_causes(causes: &[CoercionError]) -> String {
    causes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from parsing a schema descriptor.
///
/// `path` is a JSON Pointer into the descriptor document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid descriptor at {path}: expected string or object, got {actual}")]
    InvalidDescriptor { path: String, actual: String },

    #[error("unknown primitive \"{name}\" at {path}: expected string, number, boolean or undefined")]
    UnknownPrimitive { path: String, name: String },

    #[error("unknown schema form at {path}: expected exactly one of literal, object, oneOf, got [{}]", keys.join(", "))]
    UnknownForm { path: String, keys: Vec<String> },

    #[error("invalid literal at {path}: expected a primitive value, got {actual}")]
    NonPrimitiveLiteral { path: String, actual: String },

    #[error("invalid object at {path}: expected field map, got {actual}")]
    InvalidFields { path: String, actual: String },

    #[error("duplicate field \"{key}\" at {path}")]
    DuplicateField { path: String, key: String },

    #[error("invalid oneOf at {path}: expected non-empty array of alternatives")]
    EmptyOneOf { path: String },
}

/// Errors while loading JSON documents or schemas.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidSchema(#[from] SchemaError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors from coercing into a Rust type.
#[derive(Debug, Error)]
pub enum CoerceIntoError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error("coerced value does not decode: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("schema.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidSchema(SchemaError::EmptyOneOf { path: "".into() });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn coercion_error_display() {
        let err = CoercionError::at_key(
            ["buyer", "age"],
            CoercionError::invalid_type("number", Value::from("ten")),
        );
        assert_eq!(err.to_string(), r#"buyer.age: expected number, got "ten""#);

        let err = CoercionError::missing_key(["a", "b"]);
        assert_eq!(err.to_string(), "a.b: missing required key");

        let err = CoercionError::joint(vec![
            CoercionError::invalid_type("a", Value::from(true)),
            CoercionError::invalid_type("b", Value::from(true)),
        ]);
        assert_eq!(
            err.to_string(),
            "no alternative matched (expected a, got true; expected b, got true)"
        );
    }

    #[test]
    fn coercion_error_serializes_tagged() {
        let err = CoercionError::at_key(["y"], CoercionError::invalid_type("number", false.into()));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "kind": "atKey",
                "path": ["y"],
                "cause": {"kind": "invalidType", "expected": "number", "actual": false}
            })
        );
    }

    #[test]
    fn path_of_root_errors_is_empty() {
        assert!(CoercionError::invalid_type("string", Value::Null).path().is_empty());
        assert_eq!(CoercionError::missing_key(["x"]).path(), ["x"]);
    }
}
