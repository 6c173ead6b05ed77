use std::path::Path;
use std::process;

use itf_trace::DecodeOptions;

use super::describe_expr;
use crate::{load_or_exit, report_error, OutputFormat};

pub(crate) fn cmd_state(
    file: &Path,
    index: usize,
    options: &DecodeOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let trace = load_or_exit(file, options, output, quiet);

    let state = match trace.state(index) {
        Some(s) => s,
        None => {
            let msg = format!(
                "state {} out of range: trace has {} states",
                index,
                trace.len()
            );
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }

    match output {
        OutputFormat::Json => {
            let vars: serde_json::Map<String, serde_json::Value> = state
                .var_values
                .iter()
                .map(|(name, expr)| (name.clone(), describe_expr(expr).into()))
                .collect();
            let json = serde_json::json!({
                "state": index,
                "index": state.index(),
                "vars": vars,
            });
            let json = serde_json::to_string_pretty(&json)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            match state.index() {
                Some(meta_index) if meta_index != index as u64 => {
                    println!("state {} (#meta index {})", index, meta_index)
                }
                _ => println!("state {}", index),
            }
            if state.var_values.is_empty() {
                println!("  (no variables)");
            }
            for (name, expr) in &state.var_values {
                println!("  {}: {}", name, describe_expr(expr));
            }
        }
    }
}
