use super::CliError;
use conform_core::common::MilestoneTable;
use conform_core::domain::ConformError;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so the progress lines on stdout stay clean. Verbosity
/// follows `RUST_LOG`, defaulting to warnings only.
pub(super) fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to install log subscriber: {error}"))
}

pub(super) fn load_milestone_table(path: Option<&Path>) -> Result<MilestoneTable, CliError> {
    let table = match path {
        Some(path) => MilestoneTable::from_path(path),
        None => MilestoneTable::embedded(),
    };
    table.map_err(|error| CliError::Run(ConformError::from(error)))
}
