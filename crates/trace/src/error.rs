//! Error types for ITF decoding and trace loading.

use std::path::PathBuf;

/// All errors that can be returned while decoding an ITF value or document.
///
/// Every variant carries the JSON path (`$.states[0].x`) of the value that
/// failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A JSON `null` appeared where an ITF value was expected.
    #[error("{path}: null value not allowed")]
    NullNotAllowed { path: String },

    /// A `#map` entry is not a two-element `[key, value]` array.
    #[error("{path}: map entry is not a [key, value] pair: {found}")]
    MalformedMapEntry { path: String, found: String },

    /// A `#map` key decoded to a value that cannot be flattened to a string.
    #[error("{path}: unsupported map key of kind {kind}")]
    UnsupportedKeyType { path: String, kind: &'static str },

    /// A `#bigint` literal does not fit in a signed 64-bit integer.
    #[error("{path}: bigint {literal} is out of the 64-bit signed range")]
    BigIntOutOfRange { path: String, literal: String },

    /// A `#bigint` literal is not a base-10 integer.
    #[error("{path}: invalid bigint literal {literal:?}")]
    BigIntParseError { path: String, literal: String },

    /// A JSON value of a kind the grammar does not cover at this position.
    #[error("{path}: unexpected {found}, expected {expected}")]
    UnexpectedType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Two `#map` entries flattened to the same key while duplicate keys
    /// are rejected.
    #[error("{path}: duplicate map key {key:?}")]
    DuplicateMapKey { path: String, key: String },

    /// A top-level trace field has the wrong JSON kind.
    #[error("{path}: field '{field}' must be {expected}")]
    InvalidField {
        path: String,
        field: &'static str,
        expected: &'static str,
    },
}

impl DecodeError {
    /// The JSON path of the value that failed to decode.
    pub fn path(&self) -> &str {
        match self {
            DecodeError::NullNotAllowed { path }
            | DecodeError::MalformedMapEntry { path, .. }
            | DecodeError::UnsupportedKeyType { path, .. }
            | DecodeError::BigIntOutOfRange { path, .. }
            | DecodeError::BigIntParseError { path, .. }
            | DecodeError::UnexpectedType { path, .. }
            | DecodeError::DuplicateMapKey { path, .. }
            | DecodeError::InvalidField { path, .. } => path,
        }
    }
}

/// Errors from reading a trace document off storage.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The trace file does not exist.
    #[error("trace file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The input exists but could not be opened or read. `origin` is the
    /// file path, or a placeholder such as `<reader>` for stream input.
    #[error("error reading trace from '{origin}': {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The input is not well-formed JSON.
    #[error("error parsing JSON in '{origin}': {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The input is JSON but not a valid ITF trace.
    #[error("invalid trace in '{origin}': {source}")]
    Decode {
        origin: String,
        #[source]
        source: DecodeError,
    },
}

/// Renders a JSON value's kind for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
