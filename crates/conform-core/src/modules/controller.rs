use super::comparator::{compare, compare_text};
use super::report::{DEFAULT_REPORT_PATH, ReportAggregator};
use super::resolver::{join_corpus_path, lookup_milestone, resolve_fixtures};
use super::runner::{DualProcessRunner, Invocation, ProcessExecutor};
use crate::common::config::{DEFAULT_CORPUS_CONFIG_PATH, load_corpus_root};
use crate::common::milestones::MilestoneTable;
use crate::domain::{ConformError, ConformResult, Fixture, RunSummary, Verdict};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_LAUNCHER: &str = "java -jar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub corpus_config_path: PathBuf,
    pub report_path: PathBuf,
    pub launcher: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            corpus_config_path: PathBuf::from(DEFAULT_CORPUS_CONFIG_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            launcher: DEFAULT_LAUNCHER.to_string(),
        }
    }
}

/// The two positional operator arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub milestone: String,
    pub candidate: String,
}

/// Everything validated and resolved; nothing has been executed or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRun {
    pub milestone: String,
    pub fixtures: Vec<Fixture>,
    pub reference: Invocation,
    pub candidate: Invocation,
}

pub fn validate_args(args: &[String]) -> ConformResult<RunRequest> {
    match args {
        [milestone, candidate] => Ok(RunRequest {
            milestone: milestone.clone(),
            candidate: candidate.clone(),
        }),
        _ => Err(ConformError::input_validation(
            "INPUT.ARG_COUNT",
            format!(
                "expected two program arguments (milestone, candidate); got {}",
                args.len()
            ),
        )),
    }
}

/// Drives one run: validate, resolve, execute every fixture in order, then
/// finalize the report. All configuration checks happen before the report
/// file is created.
pub struct RunController<E> {
    table: MilestoneTable,
    settings: RunSettings,
    executor: E,
}

impl<E: ProcessExecutor> RunController<E> {
    pub fn new(table: MilestoneTable, settings: RunSettings, executor: E) -> Self {
        Self {
            table,
            settings,
            executor,
        }
    }

    pub fn prepare(&self, args: &[String]) -> ConformResult<PreparedRun> {
        let request = validate_args(args)?;
        let milestone = lookup_milestone(&self.table, &request.milestone)?;

        if !Path::new(&request.candidate).exists() {
            return Err(ConformError::input_validation(
                "INPUT.CANDIDATE_MISSING",
                format!("unable to find '{}'", request.candidate),
            ));
        }

        let corpus_root = load_corpus_root(&self.settings.corpus_config_path)?;
        let artifact = if Path::new(&milestone.reference_artifact).is_absolute() {
            milestone.reference_artifact.clone()
        } else {
            join_corpus_path(&corpus_root, &milestone.reference_artifact)
        };
        let Some(reference) = Invocation::reference(&self.settings.launcher, artifact) else {
            return Err(ConformError::input_validation(
                "INPUT.LAUNCHER",
                "reference launcher command is empty",
            ));
        };

        Ok(PreparedRun {
            milestone: milestone.name.clone(),
            fixtures: resolve_fixtures(milestone, &corpus_root),
            reference,
            candidate: Invocation::candidate(request.candidate),
        })
    }

    /// Validates `args`, truncates the report file and runs the milestone.
    pub fn run(self, args: &[String]) -> ConformResult<RunSummary> {
        let prepared = self.prepare(args)?;
        let aggregator = ReportAggregator::create(&self.settings.report_path)?;
        self.execute(prepared, aggregator)
    }

    pub fn execute<R: Write, C: Write>(
        self,
        prepared: PreparedRun,
        mut aggregator: ReportAggregator<R, C>,
    ) -> ConformResult<RunSummary> {
        let PreparedRun {
            milestone,
            fixtures,
            reference,
            candidate,
        } = prepared;
        tracing::info!(
            milestone = %milestone,
            fixtures = fixtures.len(),
            "starting differential run"
        );

        let runner = DualProcessRunner::new(self.executor, reference, candidate);
        let total = fixtures.len();
        for (index, fixture) in fixtures.into_iter().enumerate() {
            aggregator.begin_fixture(index, total, &fixture)?;
            let verdict = run_fixture(&runner, fixture);
            aggregator.record(verdict)?;
        }

        let summary = aggregator.finalize()?;
        tracing::info!(
            milestone = %milestone,
            passed = summary.passed,
            failed = summary.failed,
            "differential run finished"
        );
        Ok(summary)
    }
}

/// Any process fault becomes a FAIL verdict carrying the fault description
/// as the candidate text, so one broken fixture never stops the run.
fn run_fixture<E: ProcessExecutor>(runner: &DualProcessRunner<E>, fixture: Fixture) -> Verdict {
    match runner.execute(&fixture) {
        Ok(output) => {
            let comparison = compare_text(&output.reference, &output.candidate);
            if comparison.passed {
                Verdict::pass(fixture)
            } else {
                Verdict::fail(fixture, comparison.reference, comparison.candidate)
            }
        }
        Err(fault) => {
            let description = fault.description();
            tracing::warn!(
                fixture = %fixture,
                fault = %description,
                "fixture recorded as failure"
            );
            let comparison = compare(Some(fault.reference.as_str()), Some(description.as_str()));
            Verdict::fail(fixture, comparison.reference, comparison.candidate)
        }
    }
}
