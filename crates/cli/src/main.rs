mod commands;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use itf_trace::{DecodeOptions, KeyCollision, Trace};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// ITF trace file checker.
#[derive(Parser)]
#[command(name = "itf", version, about = "ITF trace file checker")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Fail when two entries of one #map flatten to the same key
    #[arg(long, global = true)]
    reject_duplicate_keys: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a trace file and print a summary
    Check {
        /// Path to the ITF JSON file (`-` reads stdin)
        file: PathBuf,
    },

    /// List the variables of one state
    State {
        /// Path to the ITF JSON file (`-` reads stdin)
        file: PathBuf,
        /// Position of the state in the trace (0-based)
        index: usize,
    },
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let options = DecodeOptions::new().with_key_collision(if cli.reject_duplicate_keys {
        KeyCollision::Reject
    } else {
        KeyCollision::Overwrite
    });

    match cli.command {
        Commands::Check { file } => {
            commands::check::cmd_check(&file, &options, cli.output, cli.quiet);
        }
        Commands::State { file, index } => {
            commands::state::cmd_state(&file, index, &options, cli.output, cli.quiet);
        }
    }
}

/// Initialize tracing on stderr with an env-driven filter (default WARN).
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Load a trace from `path`, or from stdin when `path` is `-`.
///
/// Reports the error and exits with status 1 on failure.
pub(crate) fn load_or_exit(
    path: &Path,
    options: &DecodeOptions,
    output: OutputFormat,
    quiet: bool,
) -> Trace {
    let result = if path == Path::new("-") {
        itf_trace::load_trace_from_reader(std::io::stdin().lock(), options)
    } else {
        itf_trace::load_trace_from_path_with(path, options)
    };

    match result {
        Ok(trace) => trace,
        Err(e) => {
            tracing::debug!(error = ?e, "failed to load trace");
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
