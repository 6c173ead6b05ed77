//! Assembly of ITF `State` and `Trace` documents.
//!
//! Each variable value and parameter goes through the value decoder;
//! `#meta` objects are kept as untyped JSON.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::decode::{decode_at, DecodeOptions};
use crate::error::{json_kind, DecodeError};
use crate::expr::Expr;
use crate::path::JsonPath;

pub(crate) const META_KEY: &str = "#meta";

/// One state of a trace: a value for each variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Diagnostic metadata, present only if the source had a `#meta` field.
    pub meta: Option<Map<String, Value>>,
    pub var_values: BTreeMap<String, Expr>,
}

impl State {
    /// The value of `var` in this state.
    pub fn get(&self, var: &str) -> Option<&Expr> {
        self.var_values.get(var)
    }

    /// The state index recorded in `#meta.index`, if any.
    pub fn index(&self) -> Option<u64> {
        self.meta.as_ref()?.get("index")?.as_u64()
    }

    pub fn is_empty(&self) -> bool {
        self.meta.is_none() && self.var_values.is_empty()
    }
}

/// Trace-level `#meta` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Any other `#meta` fields (`format`, `varTypes`, ...), untyped.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A decoded ITF trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    pub meta: Option<TraceMeta>,
    pub params: BTreeMap<String, Expr>,
    pub vars: Vec<String>,
    pub states: Vec<State>,
    /// Index of the state where the trace starts repeating.
    ///
    /// `Some` only when the document carries a `loop` field, so an explicit
    /// `"loop": 0` is `Some(0)` while an absent field is `None`.
    pub loop_index: Option<i64>,
}

impl Trace {
    /// The loop marker as a plain integer, `0` when the field is absent.
    pub fn loop_start(&self) -> i64 {
        self.loop_index.unwrap_or(0)
    }

    /// Whether the document declared a loop marker.
    pub fn is_lasso(&self) -> bool {
        self.loop_index.is_some()
    }

    pub fn state(&self, index: usize) -> Option<&State> {
        self.states.get(index)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Decode one state object with default options.
pub fn decode_state(value: &Value) -> Result<State, DecodeError> {
    decode_state_with(value, &DecodeOptions::default())
}

/// Decode one state object.
///
/// `null`, `""` and `{}` all yield an empty [`State`].
pub fn decode_state_with(value: &Value, options: &DecodeOptions) -> Result<State, DecodeError> {
    decode_state_at(value, &JsonPath::root(), options)
}

/// Decode a whole trace document with default options.
pub fn decode_trace(value: &Value) -> Result<Trace, DecodeError> {
    decode_trace_with(value, &DecodeOptions::default())
}

/// Decode a whole trace document.
///
/// Missing or `null` top-level fields are treated as empty.
pub fn decode_trace_with(value: &Value, options: &DecodeOptions) -> Result<Trace, DecodeError> {
    let root = JsonPath::root();
    let obj = value.as_object().ok_or_else(|| DecodeError::UnexpectedType {
        path: root.to_string(),
        expected: "a trace object",
        found: json_kind(value),
    })?;

    let meta = parse_trace_meta(obj, &root)?;

    let params = match present(obj, "params") {
        None => BTreeMap::new(),
        Some(Value::Object(fields)) => {
            let params_path = root.field("params");
            fields
                .iter()
                .map(|(name, v)| {
                    decode_at(v, &params_path.field(name), options).map(|e| (name.clone(), e))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()?
        }
        Some(_) => return Err(invalid_field(&root, "params", "an object")),
    };

    let vars = match present(obj, "vars") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| invalid_field(&root, "vars", "an array of strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid_field(&root, "vars", "an array of strings")),
    };

    let states = match present(obj, "states") {
        None => Vec::new(),
        Some(Value::Array(items)) => {
            let states_path = root.field("states");
            items
                .iter()
                .enumerate()
                .map(|(i, v)| decode_state_at(v, &states_path.index(i), options))
                .collect::<Result<Vec<_>, _>>()?
        }
        Some(_) => return Err(invalid_field(&root, "states", "an array")),
    };

    let loop_index = match present(obj, "loop") {
        None => None,
        Some(v) => Some(
            v.as_i64()
                .ok_or_else(|| invalid_field(&root, "loop", "an integer"))?,
        ),
    };

    Ok(Trace {
        meta,
        params,
        vars,
        states,
        loop_index,
    })
}

// ── Parsing helpers ─────────────────────────────────────────────────

/// A field's value, treating `null` the same as absence.
fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn invalid_field(path: &JsonPath<'_>, field: &'static str, expected: &'static str) -> DecodeError {
    DecodeError::InvalidField {
        path: path.field(field).to_string(),
        field,
        expected,
    }
}

fn decode_state_at(
    value: &Value,
    path: &JsonPath<'_>,
    options: &DecodeOptions,
) -> Result<State, DecodeError> {
    let obj = match value {
        Value::Null => return Ok(State::default()),
        Value::String(s) if s.is_empty() => return Ok(State::default()),
        Value::Object(obj) => obj,
        other => {
            return Err(DecodeError::UnexpectedType {
                path: path.to_string(),
                expected: "a state object",
                found: json_kind(other),
            })
        }
    };

    let mut meta = None;
    let mut var_values = BTreeMap::new();

    for (name, v) in obj {
        if name == META_KEY {
            meta = match v {
                Value::Null => None,
                Value::Object(m) => Some(m.clone()),
                _ => return Err(invalid_field(path, META_KEY, "an object")),
            };
        } else {
            var_values.insert(name.clone(), decode_at(v, &path.field(name), options)?);
        }
    }

    Ok(State { meta, var_values })
}

fn parse_trace_meta(
    obj: &Map<String, Value>,
    root: &JsonPath<'_>,
) -> Result<Option<TraceMeta>, DecodeError> {
    let fields = match present(obj, META_KEY) {
        None => return Ok(None),
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(invalid_field(root, META_KEY, "an object")),
    };

    let mut meta = TraceMeta::default();
    for (name, v) in fields {
        match (name.as_str(), v) {
            ("description", Value::String(s)) => meta.description = Some(s.clone()),
            ("source", Value::String(s)) => meta.source = Some(s.clone()),
            ("description" | "source", Value::Null) => {}
            ("description" | "source", _) => {
                return Err(DecodeError::UnexpectedType {
                    path: root.field(META_KEY).field(name).to_string(),
                    expected: "a string",
                    found: json_kind(v),
                })
            }
            _ => {
                meta.extra.insert(name.clone(), v.clone());
            }
        }
    }
    Ok(Some(meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_trace() -> Value {
        json!({
            "#meta": {
                "format": "ITF",
                "description": "Created by Apalache",
                "source": "counter.tla",
                "varTypes": {"x": "Int", "seen": "Set(Str)"}
            },
            "params": {"N": {"#bigint": "3"}},
            "vars": ["x", "seen"],
            "states": [
                {
                    "#meta": {"index": 0},
                    "x": {"#bigint": "0"},
                    "seen": {"#set": []}
                },
                {
                    "#meta": {"index": 1},
                    "x": {"#bigint": "1"},
                    "seen": {"#set": ["a"]}
                }
            ],
            "loop": 1
        })
    }

    // ── States ──────────────────────────────────────────────────────

    #[test]
    fn test_decode_state() {
        let state = decode_state(&json!({
            "#meta": {"index": 4},
            "x": true,
            "y": {"#map": [["z", "abc"]]}
        }))
        .unwrap();

        assert_eq!(state.index(), Some(4));
        assert_eq!(state.var_values.len(), 2);
        assert_eq!(state.get("x"), Some(&Expr::Bool(true)));
        assert_eq!(
            state.get("y").and_then(|y| y.get("z")),
            Some(&Expr::from("abc"))
        );
        assert!(!state.var_values.contains_key(META_KEY));
    }

    #[test]
    fn test_empty_states() {
        for input in [json!({}), json!(""), json!(null)] {
            let state = decode_state(&input).unwrap();
            assert!(state.meta.is_none());
            assert!(state.var_values.is_empty());
            assert!(state.is_empty());
        }
    }

    #[test]
    fn test_state_without_meta() {
        let state = decode_state(&json!({"x": 1})).unwrap();
        assert!(state.meta.is_none());
        assert_eq!(state.index(), None);
        assert_eq!(state.get("x"), Some(&Expr::Num(1.0)));
    }

    #[test]
    fn test_state_meta_is_untyped() {
        let state = decode_state(&json!({"#meta": {"index": 2, "note": null}, "x": 1})).unwrap();
        let meta = state.meta.unwrap();
        assert_eq!(meta["index"], json!(2));
        assert_eq!(meta["note"], json!(null));
    }

    #[test]
    fn test_state_rejects_non_object() {
        for input in [json!([1]), json!("x"), json!(3), json!(true)] {
            match decode_state(&input) {
                Err(DecodeError::UnexpectedType { path, .. }) => assert_eq!(path, "$"),
                other => panic!("expected UnexpectedType, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_state_bad_meta() {
        match decode_state(&json!({"#meta": [1], "x": 1})) {
            Err(DecodeError::InvalidField { path, field, .. }) => {
                assert_eq!(path, "$.#meta");
                assert_eq!(field, "#meta");
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_state_null_variable_rejected() {
        match decode_state(&json!({"x": null})) {
            Err(DecodeError::NullNotAllowed { path }) => assert_eq!(path, "$.x"),
            other => panic!("expected NullNotAllowed, got {:?}", other),
        }
    }

    // ── Traces ──────────────────────────────────────────────────────

    #[test]
    fn test_decode_trace() {
        let trace = decode_trace(&sample_trace()).unwrap();

        let meta = trace.meta.as_ref().unwrap();
        assert_eq!(meta.description.as_deref(), Some("Created by Apalache"));
        assert_eq!(meta.source.as_deref(), Some("counter.tla"));
        assert_eq!(meta.extra["format"], json!("ITF"));
        assert!(meta.extra.contains_key("varTypes"));

        assert_eq!(trace.params.get("N"), Some(&Expr::Int(3)));
        assert_eq!(trace.vars, vec!["x", "seen"]);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.loop_index, Some(1));
        assert_eq!(trace.loop_start(), 1);
        assert!(trace.is_lasso());

        let second = trace.state(1).unwrap();
        assert_eq!(second.index(), Some(1));
        assert_eq!(second.get("x"), Some(&Expr::Int(1)));
        assert_eq!(second.get("seen"), Some(&Expr::List(vec![Expr::from("a")])));
    }

    #[test]
    fn test_minimal_trace() {
        let trace = decode_trace(&json!({"vars": [], "states": []})).unwrap();
        assert!(trace.meta.is_none());
        assert!(trace.params.is_empty());
        assert!(trace.vars.is_empty());
        assert!(trace.is_empty());
        assert_eq!(trace.loop_index, None);
        assert_eq!(trace.loop_start(), 0);
        assert!(!trace.is_lasso());
    }

    #[test]
    fn test_explicit_zero_loop_is_kept() {
        let trace = decode_trace(&json!({"vars": [], "states": [{}], "loop": 0})).unwrap();
        assert_eq!(trace.loop_index, Some(0));
        assert_eq!(trace.loop_start(), 0);
        assert!(trace.is_lasso());
    }

    #[test]
    fn test_null_fields_treated_as_absent() {
        let trace = decode_trace(&json!({
            "#meta": null,
            "params": null,
            "vars": null,
            "states": null,
            "loop": null
        }))
        .unwrap();
        assert_eq!(trace, Trace::default());
    }

    #[test]
    fn test_empty_state_entries_in_trace() {
        let trace = decode_trace(&json!({"vars": ["x"], "states": ["", {}, {"x": 1}]})).unwrap();
        assert_eq!(trace.len(), 3);
        assert!(trace.states[0].is_empty());
        assert!(trace.states[1].is_empty());
        assert_eq!(trace.states[2].get("x"), Some(&Expr::Num(1.0)));
    }

    #[test]
    fn test_trace_rejects_non_object() {
        match decode_trace(&json!([])) {
            Err(DecodeError::UnexpectedType { path, found, .. }) => {
                assert_eq!(path, "$");
                assert_eq!(found, "array");
            }
            other => panic!("expected UnexpectedType, got {:?}", other),
        }
    }

    #[test]
    fn test_trace_invalid_fields() {
        let cases = [
            (json!({"params": []}), "params"),
            (json!({"vars": "x"}), "vars"),
            (json!({"vars": ["x", 1]}), "vars"),
            (json!({"states": {}}), "states"),
            (json!({"loop": "1"}), "loop"),
            (json!({"loop": 1.5}), "loop"),
            (json!({"#meta": "x"}), "#meta"),
        ];
        for (input, expected_field) in cases {
            match decode_trace(&input) {
                Err(DecodeError::InvalidField { field, path, .. }) => {
                    assert_eq!(field, expected_field);
                    assert_eq!(path, format!("$.{}", expected_field));
                }
                other => panic!("expected InvalidField for {}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_trace_meta_wrong_description_type() {
        match decode_trace(&json!({"#meta": {"description": 5}})) {
            Err(DecodeError::UnexpectedType { path, .. }) => {
                assert_eq!(path, "$.#meta.description")
            }
            other => panic!("expected UnexpectedType, got {:?}", other),
        }
    }

    #[test]
    fn test_state_error_path_in_trace() {
        let err = decode_trace(&json!({
            "vars": ["x"],
            "states": [{"x": 1}, {"x": {"#bigint": "1e3"}}]
        }))
        .unwrap_err();
        match err {
            DecodeError::BigIntParseError { path, literal } => {
                assert_eq!(path, "$.states[1].x.#bigint");
                assert_eq!(literal, "1e3");
            }
            other => panic!("expected BigIntParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_param_error_path() {
        match decode_trace(&json!({"params": {"N": null}})) {
            Err(DecodeError::NullNotAllowed { path }) => assert_eq!(path, "$.params.N"),
            other => panic!("expected NullNotAllowed, got {:?}", other),
        }
    }

    #[test]
    fn test_options_reach_states() {
        let input = json!({"states": [{"m": {"#map": [["k", 1], ["k", 2]]}}]});
        let lenient = decode_trace(&input).unwrap();
        assert_eq!(
            lenient.states[0].get("m").and_then(|m| m.get("k")),
            Some(&Expr::Num(2.0))
        );

        let strict = DecodeOptions::new().with_key_collision(crate::KeyCollision::Reject);
        match decode_trace_with(&input, &strict) {
            Err(DecodeError::DuplicateMapKey { path, .. }) => {
                assert_eq!(path, "$.states[0].m.#map[1]")
            }
            other => panic!("expected DuplicateMapKey, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_trace_is_deterministic() {
        let input = sample_trace();
        assert_eq!(decode_trace(&input).unwrap(), decode_trace(&input).unwrap());
    }
}
