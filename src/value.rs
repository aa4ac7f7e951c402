//! Dynamic input values.
//!
//! Inputs are untyped, so they are modelled after the host value universe the
//! schemas describe: `undefined` is distinct from `null`, numbers are `f64`,
//! and object members keep their insertion order.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// An untyped value checked against a schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

/// Outcome of looking a key up on a value.
///
/// `Absent` and `Undefined` are kept apart because an optional field that is
/// present-but-undefined survives coercion, while an absent one does not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence<'a> {
    Absent,
    Undefined,
    Defined(&'a Value),
}

impl Value {
    /// Build an object value from key/value pairs, keeping their order.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The `typeof` tag of this value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
        }
    }

    /// Whether the value can carry keyed members. `null` cannot.
    pub fn is_object_like(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Look up `key` on this value.
    ///
    /// Arrays expose their indices as keys; primitives have no members.
    pub fn lookup(&self, key: &str) -> Presence<'_> {
        let found = match self {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match found {
            None => Presence::Absent,
            Some(Value::Undefined) => Presence::Undefined,
            Some(value) => Presence::Defined(value),
        }
    }

    /// Strict (`===`) equality.
    ///
    /// Arrays and objects have no identity to compare, so they are never
    /// strictly equal to anything.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// Render the value the way string interpolation would.
    ///
    /// Used to turn a literal into the `expected` text of an error.
    pub fn describe(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.describe(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Number(n) if !n.is_finite() => f.write_str(&format_number(*n)),
            other => {
                let text = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    serializer.serialize_i64(*n as i64)
                } else if n.is_finite() {
                    serializer.serialize_f64(*n)
                } else {
                    serializer.serialize_unit()
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(members) => {
                let defined = members.iter().filter(|(_, v)| **v != Value::Undefined);
                let mut map = serializer.serialize_map(None)?;
                for (k, v) in defined {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_of_follows_typeof_rules() {
        assert_eq!(Value::Undefined.type_of(), "undefined");
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::from(vec![1, 2]).type_of(), "object");
        assert_eq!(Value::from(1.5).type_of(), "number");
        assert_eq!(Value::from("x").type_of(), "string");
        assert_eq!(Value::from(false).type_of(), "boolean");
    }

    #[test]
    fn null_is_not_object_like() {
        assert!(!Value::Null.is_object_like());
        assert!(Value::object([("a", 1)]).is_object_like());
        assert!(Value::from(vec!["a"]).is_object_like());
    }

    #[test]
    fn lookup_distinguishes_absent_from_undefined() {
        let value = Value::object([("x", Value::Undefined), ("y", Value::from(2))]);
        assert_eq!(value.lookup("x"), Presence::Undefined);
        assert_eq!(value.lookup("z"), Presence::Absent);
        assert_eq!(value.lookup("y"), Presence::Defined(&Value::Number(2.0)));
    }

    #[test]
    fn lookup_on_arrays_uses_indices() {
        let value = Value::from(vec!["a", "b"]);
        assert_eq!(value.lookup("1"), Presence::Defined(&Value::from("b")));
        assert_eq!(value.lookup("2"), Presence::Absent);
        assert_eq!(value.lookup("length"), Presence::Absent);
        assert_eq!(Value::from("abc").lookup("0"), Presence::Absent);
    }

    #[test]
    fn strict_equality() {
        assert!(Value::from("a").strict_equals(&Value::from("a")));
        assert!(!Value::from(1).strict_equals(&Value::from("1")));
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
        let obj = Value::object([("a", 1)]);
        assert!(!obj.strict_equals(&obj.clone()));
    }

    #[test]
    fn describe_matches_interpolation() {
        assert_eq!(Value::from(42).describe(), "42");
        assert_eq!(Value::from(1.5).describe(), "1.5");
        assert_eq!(Value::Number(-0.0).describe(), "0");
        assert_eq!(Value::Number(f64::INFINITY).describe(), "Infinity");
        assert_eq!(Value::from("a").describe(), "a");
        assert_eq!(Value::from(true).describe(), "true");
        assert_eq!(Value::Null.describe(), "null");
        assert_eq!(Value::Undefined.describe(), "undefined");
    }

    #[test]
    fn serialize_omits_undefined_members() {
        let value = Value::object([
            ("x", Value::Undefined),
            ("y", Value::from(20)),
            ("z", Value::from(vec![Value::Undefined, Value::from(0.5)])),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, json!({"y": 20, "z": [null, 0.5]}));
    }

    #[test]
    fn serialize_keeps_integers_beyond_i64_as_floats() {
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        let json = serde_json::to_value(Value::Number(two_pow_63)).unwrap();
        assert_eq!(json, json!(two_pow_63));
        assert_eq!(json.as_f64(), Some(two_pow_63));
        assert!(json.as_i64().is_none());

        let json = serde_json::to_value(Value::Number(-12.0)).unwrap();
        assert_eq!(json.as_i64(), Some(-12));
    }

    #[test]
    fn from_json_keeps_member_order() {
        let value = Value::from(json!({"b": 1, "a": [true, null]}));
        let Value::Object(members) = &value else {
            panic!("expected object");
        };
        let keys: Vec<_> = members.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(
            members["a"],
            Value::Array(vec![Value::Boolean(true), Value::Null])
        );
    }

    #[test]
    fn display_renders_json_text() {
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::object([("c", 12)]).to_string(), r#"{"c":12}"#);
    }
}
