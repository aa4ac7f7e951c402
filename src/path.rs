//! Nesting errors under the key at which they occurred.
//!
//! Paths are concatenated, never nested: scoping `AtKey(["b"], e)` under `"a"`
//! yields `AtKey(["a", "b"], e)`, so the cause of an `AtKey` is always a leaf.

use crate::error::{CoercionError, KeyPath};

/// Prefix `error`'s location with `prefix`.
///
/// A `Joint` is scoped member by member, since each alternative failed at its
/// own location.
pub fn scope(prefix: &[String], error: CoercionError) -> CoercionError {
    if prefix.is_empty() {
        return error;
    }
    match error {
        CoercionError::MissingKey { path } => CoercionError::MissingKey {
            path: concat(prefix, path),
        },
        CoercionError::AtKey { path, cause } => CoercionError::AtKey {
            path: concat(prefix, path),
            cause,
        },
        CoercionError::Joint { causes } => CoercionError::Joint {
            causes: causes.into_iter().map(|c| scope(prefix, c)).collect(),
        },
        leaf @ CoercionError::InvalidType { .. } => CoercionError::AtKey {
            path: prefix.to_vec(),
            cause: Box::new(leaf),
        },
    }
}

/// Scope `error` under a single key.
pub fn scope_key(key: &str, error: CoercionError) -> CoercionError {
    scope(&[key.to_string()], error)
}

fn concat(prefix: &[String], path: KeyPath) -> KeyPath {
    let mut joined = Vec::with_capacity(prefix.len() + path.len());
    joined.extend_from_slice(prefix);
    joined.extend(path);
    joined
}
