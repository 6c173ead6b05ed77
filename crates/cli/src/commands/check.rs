use std::path::Path;

use itf_trace::{DecodeOptions, Trace, TraceMeta};
use serde::Serialize;

use crate::{load_or_exit, OutputFormat};

/// Machine-readable summary printed by `itf check --output json`.
#[derive(Debug, Serialize)]
struct CheckSummary<'a> {
    valid: bool,
    states: usize,
    vars: &'a [String],
    params: Vec<&'a str>,
    #[serde(rename = "loop")]
    loop_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a TraceMeta>,
}

impl<'a> CheckSummary<'a> {
    fn new(trace: &'a Trace) -> Self {
        CheckSummary {
            valid: true,
            states: trace.len(),
            vars: &trace.vars,
            params: trace.params.keys().map(String::as_str).collect(),
            loop_index: trace.loop_index,
            meta: trace.meta.as_ref(),
        }
    }
}

pub(crate) fn cmd_check(file: &Path, options: &DecodeOptions, output: OutputFormat, quiet: bool) {
    let trace = load_or_exit(file, options, output, quiet);

    if quiet {
        return;
    }

    let summary = CheckSummary::new(&trace);
    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            let loop_desc = match summary.loop_index {
                Some(i) => format!("loop at state {}", i),
                None => "no loop".to_string(),
            };
            println!(
                "ok: {} states, {} vars, {} params, {}",
                summary.states,
                summary.vars.len(),
                summary.params.len(),
                loop_desc
            );
            if let Some(meta) = summary.meta {
                if let Some(ref description) = meta.description {
                    println!("  description: {}", description);
                }
                if let Some(ref source) = meta.source {
                    println!("  source: {}", source);
                }
            }
            if !summary.vars.is_empty() {
                println!("  vars: {}", summary.vars.join(", "));
            }
        }
    }
}
