// liftboard - query a powerlifting records sheet from the command line

mod exit_codes;
mod query;
mod render;
mod shell;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use liftboard_config::{ConfigError, Settings};
use liftboard_io::IoError;
use liftboard_records::SelectionError;

use exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_SOURCE, EXIT_SUCCESS, EXIT_USAGE, EXIT_WRITE};
use query::{ExportFormat, FilterArgs, OutputFormat, SourceArgs};

#[derive(Parser)]
#[command(name = "liftboard")]
#[command(about = "Filter a powerlifting records sheet and show the top record per class and lift")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/liftboard/config.toml)
    #[arg(long, global = true, env = "LIFTBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the heaviest record for each weight class and lift
    #[command(after_help = "\
Examples:
  liftboard best records.csv --division Junior --testing Tested
  liftboard best records.csv --discipline 'Single Lifts' --sex F
  liftboard best records.csv --search jun
  liftboard best records.csv --all --format html -o records.html")]
    Best {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "table")]
        format: OutputFormat,

        /// Output file (omit or '-' for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Show results even when no filter is chosen
        #[arg(long)]
        all: bool,
    },

    /// Export every record matching the filters
    #[command(after_help = "\
Examples:
  liftboard filter records.csv --sex F -o women.csv
  liftboard filter records.csv --class 90 --format json")]
    Filter {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file (omit or '-' for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the values each filter accepts
    Options {
        #[command(flatten)]
        source: SourceArgs,

        /// List coarse division groups (Teen, Junior, Opens, Masters)
        #[arg(long)]
        group_divisions: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: change filters line by line
    #[command(after_help = "\
Commands inside the shell:
  sex=F, division=Junior, testing=Tested, class=90, discipline=Single Lifts
  search=jun, mode=tokens, grouping=grouped
  show | rows | options | export <file> | reset | help | quit")]
    Shell {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let result = Settings::load(cli.config.as_deref())
        .map_err(CliError::config)
        .and_then(|settings| run(cli.command, &settings));

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

fn run(command: Commands, settings: &Settings) -> Result<(), CliError> {
    match command {
        Commands::Best {
            source,
            filters,
            format,
            output,
            all,
        } => query::cmd_best(settings, source, filters, format, output, all),
        Commands::Filter {
            source,
            filters,
            format,
            output,
        } => query::cmd_filter(settings, source, filters, format, output),
        Commands::Options {
            source,
            group_divisions,
            json,
        } => query::cmd_options(settings, source, group_divisions, json),
        Commands::Shell { source } => shell::cmd_shell(settings, source),
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

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        Self { code: EXIT_CONFIG, message: err.to_string(), hint: None }
    }

    pub fn selection(err: SelectionError) -> Self {
        Self::args(err.to_string())
    }

    /// The records file could not be loaded.
    pub fn source(err: IoError) -> Self {
        let hint = match &err {
            IoError::MissingColumn { .. } => {
                Some("the records sheet needs at least Full Name, Weight and Class columns".to_string())
            }
            IoError::Decode { .. } => {
                Some("set [data] encoding = \"auto\" to fall back to Windows-1252".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_SOURCE, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
