use super::CliError;
use conform_core::common::MilestoneTable;
use conform_core::modules::{RunController, RunSettings, SystemProcessExecutor};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub(super) struct RunCommandSettings {
    pub(super) corpus_config_path: PathBuf,
    pub(super) report_path: PathBuf,
    pub(super) launcher: String,
    pub(super) timeout_secs: u64,
}

/// A completed run exits 0 whatever the verdicts were; only configuration
/// problems produce a non-zero status.
pub(super) fn run_differential_command(
    table: MilestoneTable,
    settings: RunCommandSettings,
    args: &[String],
) -> Result<i32, CliError> {
    let executor = SystemProcessExecutor::with_timeout_secs(settings.timeout_secs);
    let run_settings = RunSettings {
        corpus_config_path: settings.corpus_config_path,
        report_path: settings.report_path,
        launcher: settings.launcher,
    };

    let summary = RunController::new(table, run_settings, executor).run(args)?;
    tracing::debug!(total = summary.total(), "report written");
    Ok(0)
}

pub(super) fn run_list_command(table: &MilestoneTable) -> Result<i32, CliError> {
    for line in milestone_listing(table) {
        println!("{}", line);
    }
    Ok(0)
}

fn milestone_listing(table: &MilestoneTable) -> Vec<String> {
    table
        .iter()
        .map(|milestone| {
            let count = milestone.fixtures.len();
            let noun = if count == 1 { "fixture" } else { "fixtures" };
            format!("{} ({} {})", milestone.name, count, noun)
        })
        .collect()
}
