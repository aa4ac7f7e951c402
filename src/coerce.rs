//! Fail-fast coercion: the validated value, or the first error found.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::error::{CoerceIntoError, CoercionError};
use crate::path::scope_key;
use crate::schema::{Field, Schema};
use crate::value::{Presence, Value};

/// Check `value` against `schema`.
///
/// Objects are checked field by field in declaration order and rejected at
/// the first missing or mismatching field. Undeclared members are dropped
/// from the result. A union returns the first alternative that matches, or
/// the last alternative's error when none does; use
/// [`explain`](crate::explain) for every cause.
///
/// # Errors
///
/// Returns the first `CoercionError` encountered.
pub fn coerce_to(schema: &Schema, value: &Value) -> Result<Value, CoercionError> {
    tracing::trace!(schema = schema.kind(), "coercing value");
    let result = coerce_schema(schema, value);
    if let Err(err) = &result {
        tracing::debug!(error = %err, "coercion failed");
    }
    result
}

/// Coerce `value` and decode the result into `T`.
///
/// # Errors
///
/// Returns `CoerceIntoError::Coercion` if the value does not conform, or
/// `CoerceIntoError::Decode` if the validated value does not fit `T`.
pub fn coerce_into<T: DeserializeOwned>(schema: &Schema, value: &Value) -> Result<T, CoerceIntoError> {
    let coerced = coerce_to(schema, value)?;
    serde_json::to_value(&coerced)
        .and_then(serde_json::from_value::<T>)
        .map_err(|source| CoerceIntoError::Decode { source })
}

// --- Internal implementation ---

fn coerce_schema(schema: &Schema, value: &Value) -> Result<Value, CoercionError> {
    match schema {
        Schema::Primitive(kind) => {
            if kind.matches(value) {
                Ok(value.clone())
            } else {
                Err(CoercionError::invalid_type(kind.as_str(), value.clone()))
            }
        }
        Schema::Literal(literal) => {
            if literal.strict_equals(value) {
                Ok(value.clone())
            } else {
                Err(CoercionError::invalid_type(literal.describe(), value.clone()))
            }
        }
        Schema::Object(fields) => coerce_object(fields, value),
        Schema::OneOf(alternatives) => coerce_one_of(alternatives, value),
    }
}

fn coerce_object(fields: &[Field], value: &Value) -> Result<Value, CoercionError> {
    if !value.is_object_like() {
        return Err(CoercionError::invalid_type("object", value.clone()));
    }

    let mut result = IndexMap::with_capacity(fields.len());
    for field in fields {
        match value.lookup(&field.key) {
            Presence::Defined(member) => {
                let coerced =
                    coerce_schema(&field.schema, member).map_err(|err| scope_key(&field.key, err))?;
                result.insert(field.key.clone(), coerced);
            }
            _ if !field.optional => {
                return Err(CoercionError::missing_key([field.key.as_str()]));
            }
            Presence::Undefined => {
                result.insert(field.key.clone(), Value::Undefined);
            }
            Presence::Absent => {}
        }
    }
    Ok(Value::Object(result))
}

fn coerce_one_of(alternatives: &[Schema], value: &Value) -> Result<Value, CoercionError> {
    let mut last_error = None;
    for alternative in alternatives {
        match coerce_schema(alternative, value) {
            Ok(coerced) => return Ok(coerced),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| CoercionError::joint(Vec::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn point() -> Schema {
        Schema::object([("x", Schema::string()), ("y", Schema::number())])
    }

    #[test]
    fn primitive_accepts_matching_type() {
        assert_eq!(coerce_to(&Schema::boolean(), &Value::from(true)), Ok(Value::from(true)));
        assert_eq!(
            coerce_to(&Schema::undefined(), &Value::Undefined),
            Ok(Value::Undefined)
        );
        let nan = Value::Number(f64::NAN);
        assert!(coerce_to(&Schema::number(), &nan).is_ok());
    }

    #[test]
    fn primitive_rejects_other_types() {
        assert_eq!(
            coerce_to(&Schema::string(), &Value::Null),
            Err(CoercionError::invalid_type("string", Value::Null))
        );
    }

    #[test]
    fn literal_uses_described_expectation() {
        assert_eq!(
            coerce_to(&Schema::literal(42), &Value::from("42")),
            Err(CoercionError::invalid_type("42", Value::from("42")))
        );
        assert_eq!(coerce_to(&Schema::literal(42), &Value::from(42)), Ok(Value::from(42)));
    }

    #[test]
    fn object_rejects_null() {
        assert_eq!(
            coerce_to(&point(), &Value::Null),
            Err(CoercionError::invalid_type("object", Value::Null))
        );
    }

    #[test]
    fn object_drops_undeclared_members() {
        let input = Value::object([
            ("x", Value::from("hello")),
            ("y", Value::from(12)),
            ("z", Value::from(true)),
        ]);
        assert_eq!(
            coerce_to(&point(), &input),
            Ok(Value::object([("x", Value::from("hello")), ("y", Value::from(12))]))
        );
    }

    #[test]
    fn object_stops_at_first_failure() {
        let input = Value::object([("x", 1), ("y", 2)]);
        assert_eq!(
            coerce_to(&point(), &input),
            Err(CoercionError::at_key(["x"], CoercionError::invalid_type("string", 1.into())))
        );
    }

    #[test]
    fn required_undefined_is_missing() {
        let input = Value::object([("x", Value::from("a")), ("y", Value::Undefined)]);
        assert_eq!(
            coerce_to(&point(), &input),
            Err(CoercionError::missing_key(["y"]))
        );
    }

    #[test]
    fn one_of_takes_first_match() {
        let schema = Schema::one_of([Schema::number(), Schema::literal(1)]);
        assert_eq!(coerce_to(&schema, &Value::from(1)), Ok(Value::from(1)));
    }

    #[test]
    fn empty_one_of_matches_nothing() {
        assert_eq!(
            coerce_to(&Schema::OneOf(Vec::new()), &Value::from(1)),
            Err(CoercionError::joint(Vec::new()))
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: String,
        y: f64,
        label: Option<String>,
    }

    #[test]
    fn coerce_into_decodes_typed_value() {
        let schema = Schema::object([
            ("x", Schema::string()),
            ("y", Schema::number()),
            ("label?", Schema::string()),
        ]);
        let input = Value::object([("x", Value::from("a")), ("y", Value::from(2.5))]);
        let point: Point = coerce_into(&schema, &input).unwrap();
        assert_eq!(
            point,
            Point {
                x: "a".into(),
                y: 2.5,
                label: None
            }
        );
    }

    #[test]
    fn coerce_into_reports_coercion_error() {
        let input = Value::object([("x", "a")]);
        let err = coerce_into::<Point>(&point(), &input).unwrap_err();
        assert!(matches!(
            err,
            CoerceIntoError::Coercion(CoercionError::MissingKey { .. })
        ));
    }

    #[test]
    fn coerce_into_reports_decode_error() {
        let input = Value::object([("x", Value::from("a")), ("y", Value::from(1))]);
        let err = coerce_into::<Vec<String>>(&point(), &input).unwrap_err();
        assert!(matches!(err, CoerceIntoError::Decode { .. }));
    }
}
