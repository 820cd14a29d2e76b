// panchanga CLI - fetch, clean, and reconcile yearly almanac datasets

mod clean;
mod compare;
mod exit_codes;
mod fetch;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "panchanga")]
#[command(about = "Fetch, clean, and reconcile yearly panchanga datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download one year of daily almanac data into a raw JSON archive
    #[command(after_help = "\
Examples:
  panchanga fetch -c configs/bengaluru-2025.toml -o panchanga_2025_raw.json
  panchanga fetch -c job.toml -o raw.json   # reruns resume a partial archive")]
    Fetch {
        /// Job config (TOML): API URL, coordinates, year, retry policy
        #[arg(long, short = 'c')]
        config: PathBuf,

        /// Raw archive to write (reloaded on rerun to skip fetched days)
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Convert a raw archive into the clean comparison shape
    #[command(after_help = "\
Examples:
  panchanga clean panchanga_2025_raw.json -o panchanga_2025_original.json")]
    Clean {
        /// Raw archive produced by fetch
        input: PathBuf,

        /// Clean dataset to write
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Compare two clean datasets and report timing discrepancies
    #[command(after_help = "\
Examples:
  panchanga compare original.json computed.json
  panchanga compare original.json computed.json --threshold 30
  panchanga compare original.json computed.json --json -o result.json")]
    Compare {
        /// Reference dataset (drives day iteration order)
        original: PathBuf,

        /// Independently computed dataset
        computed: PathBuf,

        /// Highlight differences above this many minutes
        #[arg(long, default_value_t = 15.0)]
        threshold: f64,

        /// Emit the full comparison result as JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch { config, output } => fetch::cmd_fetch(&config, &output),
        Commands::Clean { input, output } => clean::cmd_clean(&input, &output),
        Commands::Compare { original, computed, threshold, json, output } => {
            compare::cmd_compare(&original, &computed, threshold, json, output.as_deref())
        }
    };

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
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}
