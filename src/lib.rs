//! Schema Coerce
//!
//! Runtime validation of untyped values against declarative schemas.
//!
//! A [`Schema`] describes an expected shape: a primitive type, a literal
//! value, an object with named (optionally `?`-suffixed, optional) fields, or
//! a union of alternatives. Two engines check a [`Value`] against it:
//!
//! - [`coerce_to`] is fail-fast: it returns the validated value, or the first
//!   error it meets.
//! - [`explain`] is exhaustive: it returns `None` for a conforming value, or
//!   an [`Explanation`] citing every violation at every path.
//!
//! # Example
//!
//! ```
//! use schema_coerce::{coerce_to, explain, CoercionError, Schema, Value};
//!
//! let point = Schema::object([("x", Schema::string()), ("y", Schema::number())]);
//!
//! let err = coerce_to(&point, &Value::object([("x", "hello")])).unwrap_err();
//! assert_eq!(err, CoercionError::missing_key(["y"]));
//!
//! let why = explain(&point, &Value::Object(Default::default())).unwrap();
//! assert_eq!(
//!     why.cause,
//!     vec![CoercionError::missing_key(["x"]), CoercionError::missing_key(["y"])]
//! );
//! ```
//!
//! # Error Paths
//!
//! | Error | Meaning |
//! |-------|---------|
//! | `InvalidType` | value present but of the wrong type or literal |
//! | `MissingKey` | required field absent or `undefined` |
//! | `AtKey` | an `InvalidType` located under a path of keys |
//! | `Joint` | one cause per failed union alternative |
//!
//! Paths always concatenate: a failure two objects deep is reported as
//! `AtKey(["a", "b"], ..)`, never as an `AtKey` inside an `AtKey`.

mod coerce;
mod error;
mod explain;
mod loader;
mod path;
mod schema;
mod value;

pub use coerce::{coerce_into, coerce_to};
pub use error::{CoerceIntoError, CoercionError, KeyPath, LoadError, SchemaError};
pub use explain::{explain, Explanation};
pub use loader::{is_url, load_json, load_json_auto, load_json_str, load_schema_auto};
pub use path::{scope, scope_key};
pub use schema::{Field, PrimitiveKind, Schema, OPTIONAL_MARKER};
pub use value::{Presence, Value};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
