mod commands;
mod helpers;

use clap::Parser;
use conform_core::common::DEFAULT_CORPUS_CONFIG_PATH;
use conform_core::domain::ConformError;
use conform_core::modules::{
    DEFAULT_LAUNCHER, DEFAULT_REPORT_PATH, DEFAULT_TIMEOUT_SECS, validate_args,
};
use std::path::PathBuf;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let conform_error = error.as_conform_error();
            eprintln!("{}", conform_error.diagnostic_line());
            eprintln!("{}", conform_error.fatal_exit_line());
            conform_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("conform".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// Options must come before the positional arguments; everything from the
/// first positional onward is collected verbatim so the run controller can
/// report the exact argument count it received.
#[derive(Parser)]
#[command(
    name = "conform",
    about = "Differential conformance runner for reference and candidate interpreters",
    override_usage = "conform [OPTIONS] <MILESTONE> <CANDIDATE>"
)]
struct Cli {
    /// Milestone name followed by the candidate interpreter path
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,

    /// File whose first line names the fixture corpus root
    #[arg(long, default_value = DEFAULT_CORPUS_CONFIG_PATH)]
    env_file: PathBuf,

    /// Plain-text report path, truncated at the start of every run
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,

    /// JSON milestone table replacing the built-in one
    #[arg(long)]
    milestones: Option<PathBuf>,

    /// Command that runs the reference artifact
    #[arg(long, default_value = DEFAULT_LAUNCHER)]
    launcher: String,

    /// Per-process timeout in seconds (0 waits forever)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Print configured milestones and exit
    #[arg(long)]
    list_milestones: bool,
}

fn dispatch_parsed(cli: Cli) -> Result<i32, CliError> {
    helpers::init_tracing()?;

    if cli.list_milestones {
        let table = helpers::load_milestone_table(cli.milestones.as_deref())?;
        return commands::run_list_command(&table);
    }

    // The argument count is reported before the milestone table is read.
    validate_args(&cli.args)?;
    let table = helpers::load_milestone_table(cli.milestones.as_deref())?;

    let settings = commands::RunCommandSettings {
        corpus_config_path: cli.env_file,
        report_path: cli.report,
        launcher: cli.launcher,
        timeout_secs: cli.timeout_secs,
    };
    commands::run_differential_command(table, settings, &cli.args)
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Run(ConformError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ConformError> for CliError {
    fn from(error: ConformError) -> Self {
        Self::Run(error)
    }
}

impl CliError {
    fn as_conform_error(&self) -> ConformError {
        match self {
            Self::Usage(message) => {
                ConformError::input_validation("INPUT.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Run(error) => error.clone(),
            Self::Internal(error) => ConformError::internal("SYS.CLI", format!("{error:#}")),
        }
    }
}
