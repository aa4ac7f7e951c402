//! Exhaustive explanation: every reason a value does not conform.

use serde::Serialize;

use crate::error::CoercionError;
use crate::path::scope_key;
use crate::schema::{Field, Schema};
use crate::value::{Presence, Value};

/// Why a value is not an instance of a schema.
///
/// `not` is the descriptor of the schema that rejected `value`, so the
/// explanation reads on its own without the schema at hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub value: Value,
    pub not: serde_json::Value,
    pub cause: Vec<CoercionError>,
}

impl Explanation {
    fn new(schema: &Schema, value: &Value, cause: Vec<CoercionError>) -> Self {
        Self {
            value: value.clone(),
            not: schema.descriptor(),
            cause,
        }
    }
}

/// Explain why `value` does not conform to `schema`.
///
/// Returns `None` when it conforms. Unlike [`coerce_to`](crate::coerce_to),
/// every field and every alternative is visited: an object reports each
/// missing or mismatching field in declaration order, and a union that
/// matches nothing reports one cause per alternative.
pub fn explain(schema: &Schema, value: &Value) -> Option<Explanation> {
    tracing::trace!(schema = schema.kind(), "explaining value");
    let explanation = explain_schema(schema, value);
    if let Some(why) = &explanation {
        tracing::debug!(causes = why.cause.len(), "value does not conform");
    }
    explanation
}

// --- Internal implementation ---

fn explain_schema(schema: &Schema, value: &Value) -> Option<Explanation> {
    match schema {
        Schema::Primitive(kind) => (!kind.matches(value)).then(|| {
            let cause = CoercionError::invalid_type(kind.as_str(), value.clone());
            Explanation::new(schema, value, vec![cause])
        }),
        Schema::Literal(literal) => (!literal.strict_equals(value)).then(|| {
            let cause = CoercionError::invalid_type(literal.describe(), value.clone());
            Explanation::new(schema, value, vec![cause])
        }),
        Schema::Object(fields) => explain_object(schema, fields, value),
        Schema::OneOf(alternatives) => explain_one_of(schema, alternatives, value),
    }
}

fn explain_object(schema: &Schema, fields: &[Field], value: &Value) -> Option<Explanation> {
    if !value.is_object_like() {
        let cause = CoercionError::invalid_type("object", value.clone());
        return Some(Explanation::new(schema, value, vec![cause]));
    }

    // A nested explanation may carry no cause (an empty union) and still fail.
    let mut failed = false;
    let mut cause = Vec::new();
    for field in fields {
        match value.lookup(&field.key) {
            Presence::Defined(member) => {
                if let Some(why) = explain_schema(&field.schema, member) {
                    failed = true;
                    cause.extend(why.cause.into_iter().map(|c| scope_key(&field.key, c)));
                }
            }
            _ if field.optional => {}
            _ => {
                failed = true;
                cause.push(CoercionError::missing_key([field.key.as_str()]));
            }
        }
    }

    failed.then(|| Explanation::new(schema, value, cause))
}

fn explain_one_of(schema: &Schema, alternatives: &[Schema], value: &Value) -> Option<Explanation> {
    let mut cause = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        // Any conforming alternative makes the whole union conform.
        let why = explain_schema(alternative, value)?;
        cause.push(alternative_cause(why.cause));
    }
    Some(Explanation::new(schema, value, cause))
}

/// Collapse one alternative's causes into a single entry.
fn alternative_cause(mut causes: Vec<CoercionError>) -> CoercionError {
    if causes.len() == 1 {
        causes.remove(0)
    } else {
        CoercionError::joint(causes)
    }
}
