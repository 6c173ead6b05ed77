//! Flattening of decoded `#map` keys into string keys.
//!
//! ITF allows any value as a `#map` key, but [`Expr::Map`] is keyed by
//! `String`. Strings are used as-is; records and maps are flattened by
//! concatenating each field name with the flattened field value, fields in
//! ascending name order, with no separator.
//!
//! The concatenation has no delimiter or escaping, so structurally distinct
//! keys can flatten to the same string: `{a: "1", b: "2"}` and `{a1: "b2"}`
//! both become `"a1b2"`. Use [`KeyCollision::Reject`] to turn such clashes
//! inside one `#map` into an error.
//!
//! [`KeyCollision::Reject`]: crate::KeyCollision::Reject

use crate::error::DecodeError;
use crate::expr::Expr;
use crate::path::JsonPath;

/// Flattens a decoded map key to its canonical string form.
///
/// Fails with [`DecodeError::UnsupportedKeyType`] for keys (or nested key
/// fields) that are not strings or maps.
pub fn canonical_key(key: &Expr) -> Result<String, DecodeError> {
    canonical_key_at(key, &JsonPath::root())
}

pub(crate) fn canonical_key_at(key: &Expr, path: &JsonPath<'_>) -> Result<String, DecodeError> {
    let mut out = String::new();
    write_key(key, path, &mut out)?;
    Ok(out)
}

fn write_key(key: &Expr, path: &JsonPath<'_>, out: &mut String) -> Result<(), DecodeError> {
    match key {
        Expr::Str(s) => {
            out.push_str(s);
            Ok(())
        }
        // BTreeMap iterates in ascending key order.
        Expr::Map(fields) => {
            for (name, value) in fields {
                out.push_str(name);
                write_key(value, &path.field(name), out)?;
            }
            Ok(())
        }
        other => Err(DecodeError::UnsupportedKeyType {
            path: path.to_string(),
            kind: other.type_name(),
        }),
    }
}
