// stdcheck CLI - fetch current standard revisions and check them against the registry

mod backfill;
mod check;
mod exit_codes;
mod fetch;
mod run;
mod runtime;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use stdcheck_config::ConfigError;
use stdcheck_core::Body;
use stdcheck_recon::ReconError;
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "stdcheck")]
#[command(about = "Track revisions of ASTM, IEC, IEEE and TSE standards")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More logging on stderr (-v info, -vv debug). RUST_LOG wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (default: the per-user config directory)
    #[arg(long, env = "STDCHECK_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch current metadata for a list of standards from one body
    #[command(after_help = "\
Examples:
  stdcheck fetch astm D92 D97
  stdcheck fetch iec --catalog catalog.toml
  stdcheck fetch tse 'TS EN IEC 60296' --out -
  stdcheck fetch ieee --catalog catalog.toml --jobs 2")]
    Fetch {
        /// Standards body
        body: Body,

        /// Identifiers to fetch (default: the body's catalog section)
        queries: Vec<String>,

        /// Query catalog (TOML)
        #[arg(long, default_value = "catalog.toml")]
        catalog: PathBuf,

        /// Output file, `-` for stdout (default: <data-dir>/<body>_fetched.json)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Concurrent requests
        #[arg(long, short = 'j')]
        jobs: Option<usize>,

        /// Data directory (overrides settings)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Compare a fetched document with the local registry
    #[command(after_help = "\
Examples:
  stdcheck check astm
  stdcheck check iec --use-actual-id --fail-on-drift
  stdcheck check tse --fetched tse_fetched.json --actual tse_actual.json --out - ")]
    Check {
        /// Standards body
        body: Body,

        /// Fetched document (default: <data-dir>/<body>_fetched.json)
        #[arg(long)]
        fetched: Option<PathBuf>,

        /// Registry document (default: <data-dir>/<body>_actual.json)
        #[arg(long)]
        actual: Option<PathBuf>,

        /// Report ids come from the matched registry entry instead of batch position
        #[arg(long)]
        use_actual_id: bool,

        /// Report file, `-` for stdout (default: <data-dir>/<body>_check.json)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Exit 1 when any entry is revised, renumbered, modified or new
        #[arg(long)]
        fail_on_drift: bool,

        /// Data directory (overrides settings)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Assign ids to registry entries that lack one (rewrites files in place)
    #[command(name = "backfill-ids")]
    #[command(after_help = "\
Examples:
  stdcheck backfill-ids data/astm_actual.json
  stdcheck backfill-ids data/*_actual.json")]
    BackfillIds {
        /// Registry documents
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Fetch every catalog body, backfill registries and write check reports
    #[command(after_help = "\
Examples:
  stdcheck run
  stdcheck run --catalog catalog.toml --data-dir data --jobs 8")]
    Run {
        /// Query catalog (TOML)
        #[arg(long, default_value = "catalog.toml")]
        catalog: PathBuf,

        /// Data directory (overrides settings)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Concurrent requests
        #[arg(long, short = 'j')]
        jobs: Option<usize>,

        /// Report ids come from the matched registry entry
        #[arg(long)]
        use_actual_id: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nbodies:  astm, iec, ieee, tse",
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nbodies:  astm, iec, ieee, tse",
            "\nbuild:   release",
        )
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout carries documents and summaries; logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = runtime::Runtime::load(cli.config.as_deref()).and_then(|rt| match cli.command {
        Commands::Fetch { body, queries, catalog, out, jobs, data_dir } => {
            fetch::cmd_fetch(&rt.with_overrides(data_dir, jobs), body, queries, catalog, out)
        }
        Commands::Check { body, fetched, actual, use_actual_id, out, json, fail_on_drift, data_dir } => {
            check::cmd_check(
                &rt.with_overrides(data_dir, None),
                check::CheckArgs { body, fetched, actual, use_actual_id, out, json, fail_on_drift },
            )
        }
        Commands::BackfillIds { files } => backfill::cmd_backfill_ids(files),
        Commands::Run { catalog, data_dir, jobs, use_actual_id } => {
            run::cmd_run(&rt.with_overrides(data_dir, jobs), catalog, use_actual_id)
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Map a config error to the matching exit code.
    pub fn config(err: ConfigError) -> Self {
        let code = match &err {
            ConfigError::Read { .. } => EXIT_IO,
            ConfigError::InvalidQuery { .. } => exit_codes::EXIT_FETCH_INVALID_QUERY,
            _ => EXIT_PARSE,
        };
        let hint = match &err {
            ConfigError::InvalidQuery { .. } => Some("catalog queries must be quoted strings".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// `path` names the document the error came from.
    pub fn recon(path: &std::path::Path, err: ReconError) -> Self {
        let code = match &err {
            ReconError::Io(_) => EXIT_IO,
            ReconError::Document { .. } | ReconError::Serialize(_) => EXIT_PARSE,
        };
        Self { code, message: format!("{}: {}", path.display(), err), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
