//! Reading trace documents from files, readers and strings.
//!
//! These are the only entry points that touch storage. The file handle is
//! owned by the reader for the duration of one call and dropped on return.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::decode::DecodeOptions;
use crate::document::{decode_trace_with, Trace};
use crate::error::LoadError;

/// Load and decode a trace file with default options.
pub fn load_trace_from_path<P: AsRef<Path>>(path: P) -> Result<Trace, LoadError> {
    load_trace_from_path_with(path, &DecodeOptions::default())
}

/// Load and decode a trace file.
///
/// Fails with [`LoadError::NotFound`] if the file does not exist.
pub fn load_trace_from_path_with<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<Trace, LoadError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            origin: origin.clone(),
            source,
        },
    })?;

    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| json_error(&origin, source))?;
    let trace = decode_document(&value, &origin, options)?;
    tracing::debug!(
        path = %origin,
        states = trace.states.len(),
        vars = trace.vars.len(),
        "loaded trace"
    );
    Ok(trace)
}

/// Decode a trace from any reader, e.g. stdin.
pub fn load_trace_from_reader<R: Read>(
    reader: R,
    options: &DecodeOptions,
) -> Result<Trace, LoadError> {
    const ORIGIN: &str = "<reader>";
    let value = serde_json::from_reader(BufReader::new(reader))
        .map_err(|source| json_error(ORIGIN, source))?;
    decode_document(&value, ORIGIN, options)
}

/// Decode a trace from an in-memory JSON string.
pub fn parse_trace_str(input: &str, options: &DecodeOptions) -> Result<Trace, LoadError> {
    const ORIGIN: &str = "<string>";
    let value = serde_json::from_str(input).map_err(|source| json_error(ORIGIN, source))?;
    decode_document(&value, ORIGIN, options)
}

/// Splits `serde_json` failures into read failures and malformed JSON.
fn json_error(origin: &str, source: serde_json::Error) -> LoadError {
    if source.is_io() {
        LoadError::Io {
            origin: origin.to_string(),
            source: io::Error::from(source),
        }
    } else {
        LoadError::Parse {
            origin: origin.to_string(),
            source,
        }
    }
}

fn decode_document(
    value: &serde_json::Value,
    origin: &str,
    options: &DecodeOptions,
) -> Result<Trace, LoadError> {
    decode_trace_with(value, options).map_err(|source| LoadError::Decode {
        origin: origin.to_string(),
        source,
    })
}
