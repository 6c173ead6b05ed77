//! Decoding of generic JSON values into [`Expr`] trees.
//!
//! The main entry point is [`decode_expr`], which takes a
//! `&serde_json::Value` and produces an [`Expr`].
//!
//! Objects are sniffed in a fixed order. A single-key object whose key is
//! `#map`, `#tup`, `#set` or `#bigint` and whose payload has the expected
//! JSON kind is decoded as that construct. Every other object, including a
//! reserved key with the wrong payload kind, is decoded as a record. A
//! genuine record whose only field is named `#map` and holds an array is
//! therefore read as a map; the format has no way to tell the two apart.

use std::collections::BTreeMap;
use std::num::IntErrorKind;

use serde_json::{Map, Value};

use crate::error::{json_kind, DecodeError};
use crate::expr::Expr;
use crate::key::canonical_key_at;
use crate::path::JsonPath;

pub(crate) const MAP_KEY: &str = "#map";
pub(crate) const TUP_KEY: &str = "#tup";
pub(crate) const SET_KEY: &str = "#set";
pub(crate) const BIGINT_KEY: &str = "#bigint";

/// What to do when two entries of one `#map` flatten to the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyCollision {
    /// The later entry replaces the earlier one.
    #[default]
    Overwrite,
    /// Fail with [`DecodeError::DuplicateMapKey`].
    Reject,
}

/// Decoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub key_collision: KeyCollision,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_collision(mut self, key_collision: KeyCollision) -> Self {
        self.key_collision = key_collision;
        self
    }
}

/// Decode one ITF value with default options.
pub fn decode_expr(value: &Value) -> Result<Expr, DecodeError> {
    decode_expr_with(value, &DecodeOptions::default())
}

/// Decode one ITF value.
pub fn decode_expr_with(value: &Value, options: &DecodeOptions) -> Result<Expr, DecodeError> {
    decode_at(value, &JsonPath::root(), options)
}

pub(crate) fn decode_at(
    value: &Value,
    path: &JsonPath<'_>,
    options: &DecodeOptions,
) -> Result<Expr, DecodeError> {
    match value {
        Value::Null => Err(DecodeError::NullNotAllowed {
            path: path.to_string(),
        }),
        Value::Bool(b) => Ok(Expr::Bool(*b)),
        Value::String(s) => Ok(Expr::Str(s.clone())),
        Value::Number(n) => n
            .as_f64()
            .map(Expr::Num)
            .ok_or_else(|| DecodeError::UnexpectedType {
                path: path.to_string(),
                expected: "a number representable as f64",
                found: "number",
            }),
        Value::Array(items) => decode_list(items, path, options),
        Value::Object(fields) => decode_object(fields, path, options),
    }
}

fn decode_object(
    fields: &Map<String, Value>,
    path: &JsonPath<'_>,
    options: &DecodeOptions,
) -> Result<Expr, DecodeError> {
    if fields.len() == 1 {
        if let Some((key, inner)) = fields.iter().next() {
            match (key.as_str(), inner) {
                (MAP_KEY, Value::Array(entries)) => {
                    return decode_map(entries, &path.field(key), options);
                }
                (TUP_KEY | SET_KEY, Value::Array(items)) => {
                    return decode_list(items, &path.field(key), options);
                }
                (BIGINT_KEY, Value::String(literal)) => {
                    return decode_bigint(literal, &path.field(key));
                }
                (MAP_KEY | TUP_KEY | SET_KEY | BIGINT_KEY, other) => {
                    tracing::trace!(
                        path = %path,
                        key = key.as_str(),
                        found = json_kind(other),
                        "reserved key with unexpected payload, decoding as record"
                    );
                }
                _ => {}
            }
        }
    }
    decode_record(fields, path, options)
}

fn decode_list(
    items: &[Value],
    path: &JsonPath<'_>,
    options: &DecodeOptions,
) -> Result<Expr, DecodeError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode_at(item, &path.index(i), options))
        .collect::<Result<Vec<_>, _>>()
        .map(Expr::List)
}

fn decode_record(
    fields: &Map<String, Value>,
    path: &JsonPath<'_>,
    options: &DecodeOptions,
) -> Result<Expr, DecodeError> {
    fields
        .iter()
        .map(|(name, value)| {
            decode_at(value, &path.field(name), options).map(|expr| (name.clone(), expr))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(Expr::Map)
}

fn decode_map(
    entries: &[Value],
    path: &JsonPath<'_>,
    options: &DecodeOptions,
) -> Result<Expr, DecodeError> {
    let mut map = BTreeMap::new();

    for (i, entry) in entries.iter().enumerate() {
        let entry_path = path.index(i);
        let (raw_key, raw_value) = match entry.as_array().map(Vec::as_slice) {
            Some([k, v]) => (k, v),
            _ => {
                return Err(DecodeError::MalformedMapEntry {
                    path: entry_path.to_string(),
                    found: entry.to_string(),
                })
            }
        };

        let value = decode_at(raw_value, &entry_path.index(1), options)?;
        let key_path = entry_path.index(0);
        let key = canonical_key_at(&decode_at(raw_key, &key_path, options)?, &key_path)?;

        if options.key_collision == KeyCollision::Reject && map.contains_key(&key) {
            return Err(DecodeError::DuplicateMapKey {
                path: entry_path.to_string(),
                key,
            });
        }
        map.insert(key, value);
    }

    Ok(Expr::Map(map))
}

fn decode_bigint(literal: &str, path: &JsonPath<'_>) -> Result<Expr, DecodeError> {
    literal
        .parse::<i64>()
        .map(Expr::Int)
        .map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                DecodeError::BigIntOutOfRange {
                    path: path.to_string(),
                    literal: literal.to_string(),
                }
            }
            _ => DecodeError::BigIntParseError {
                path: path.to_string(),
                literal: literal.to_string(),
            },
        })
}
