//! itf-trace: decoder for ITF (Informal Trace Format) documents.
//!
//! ITF encodes state-machine execution traces as JSON. Plain objects and
//! arrays are overloaded to carry records, explicit maps (`#map`), tuples
//! (`#tup`), sets (`#set`) and big integers (`#bigint`). This crate turns a
//! `serde_json::Value` tree into the tagged [`Expr`] model and assembles
//! [`State`] and [`Trace`] documents from it.
//!
//! # Public API
//!
//! - [`decode_expr()`] -- decode one ITF value
//! - [`canonical_key()`] -- flatten a decoded `#map` key to a string
//! - [`decode_state()`] / [`decode_trace()`] -- document assembly
//! - [`load_trace_from_path()`] -- read and decode a trace file
//!
//! The `_with` variants of each entry point take [`DecodeOptions`].

pub mod decode;
pub mod document;
pub mod error;
pub mod expr;
pub mod key;
pub mod load;
mod path;

pub use decode::{decode_expr, decode_expr_with, DecodeOptions, KeyCollision};
pub use document::{
    decode_state, decode_state_with, decode_trace, decode_trace_with, State, Trace, TraceMeta,
};
pub use error::{DecodeError, LoadError};
pub use expr::Expr;
pub use key::canonical_key;
pub use load::{
    load_trace_from_path, load_trace_from_path_with, load_trace_from_reader, parse_trace_str,
};
