//! Plain-text run report and live console progress.
//!
//! Report layout, one block per fixture in run order:
//!
//! ```text
//! [FAIL]
//! <fixture path>
//! [Validation]
//! <reference output>
//! [Training]
//! <candidate output>
//!
//! ------------------------------------
//!
//! ```
//!
//! Passing fixtures only carry the marker and path lines. The file ends with
//! `Passed <n>. Failed <m>.` and no trailing newline.

use crate::domain::{ConformError, Fixture, Outcome, RunSummary, Verdict};
use std::fs::File;
use std::io::{BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_PATH: &str = "test_results.txt";
const ENTRY_SEPARATOR: &str = "\n------------------------------------\n\n";
const REFERENCE_LABEL: &str = "[Validation]";
const CANDIDATE_LABEL: &str = "[Training]";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to create report '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write report '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write progress to console: {source}")]
    Console { source: std::io::Error },
}

impl From<ReportError> for ConformError {
    fn from(error: ReportError) -> Self {
        let message = error.to_string();
        match error {
            ReportError::Create { .. } | ReportError::Write { .. } => {
                ConformError::io_system("IO.REPORT_WRITE", message)
            }
            ReportError::Console { .. } => ConformError::io_system("IO.CONSOLE_WRITE", message),
        }
    }
}

pub struct ReportAggregator<R: Write, C: Write> {
    report: R,
    console: C,
    report_path: PathBuf,
    summary: RunSummary,
}

impl ReportAggregator<BufWriter<File>, Stdout> {
    /// Truncates (or creates) the report file and echoes progress to stdout.
    pub fn create(report_path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let report_path = report_path.as_ref();
        let file = File::create(report_path).map_err(|source| ReportError::Create {
            path: report_path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), std::io::stdout(), report_path))
    }
}

impl<R: Write, C: Write> ReportAggregator<R, C> {
    pub fn new(report: R, console: C, report_path: impl Into<PathBuf>) -> Self {
        Self {
            report,
            console,
            report_path: report_path.into(),
            summary: RunSummary::default(),
        }
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Prints the 1-based progress prefix; the verdict marker completes the
    /// same console line in [`record`](Self::record).
    pub fn begin_fixture(
        &mut self,
        index: usize,
        total: usize,
        fixture: &Fixture,
    ) -> Result<(), ReportError> {
        write!(
            self.console,
            "Running test {} of {} {}... ",
            index + 1,
            total,
            fixture
        )
        .and_then(|()| self.console.flush())
        .map_err(|source| ReportError::Console { source })
    }

    pub fn record(&mut self, verdict: Verdict) -> Result<(), ReportError> {
        writeln!(self.console, "{}", verdict.marker())
            .map_err(|source| ReportError::Console { source })?;

        let entry = render_entry(&verdict);
        self.write_report(&entry)?;
        self.summary.record(verdict);
        Ok(())
    }

    /// Appends the summary line, echoes it to the console and hands back the
    /// completed run summary.
    pub fn finalize(mut self) -> Result<RunSummary, ReportError> {
        let line = self.summary.summary_line();
        self.write_report(&line)?;
        writeln!(self.console, "{}", line)
            .and_then(|()| self.console.flush())
            .map_err(|source| ReportError::Console { source })?;
        Ok(self.summary)
    }

    fn write_report(&mut self, text: &str) -> Result<(), ReportError> {
        self.report
            .write_all(text.as_bytes())
            .and_then(|()| self.report.flush())
            .map_err(|source| ReportError::Write {
                path: self.report_path.clone(),
                source,
            })
    }
}

pub fn render_entry(verdict: &Verdict) -> String {
    let mut lines = vec![verdict.marker(), verdict.fixture.path()];
    if let Outcome::Fail {
        reference,
        candidate,
    } = &verdict.outcome
    {
        lines.extend([
            REFERENCE_LABEL,
            reference.as_str(),
            CANDIDATE_LABEL,
            candidate.as_str(),
        ]);
    }
    lines.push(ENTRY_SEPARATOR);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{ReportAggregator, render_entry};
    use crate::domain::{Fixture, Verdict};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn passing_entry_has_marker_path_and_separator() {
        let entry = render_entry(&Verdict::pass(Fixture::new("/c/test/a.lox")));
        assert_eq!(
            entry,
            "[PASS]\n/c/test/a.lox\n\n------------------------------------\n\n"
        );
    }

    #[test]
    fn failing_entry_carries_both_outputs() {
        let entry = render_entry(&Verdict::fail(Fixture::new("/c/test/b.lox"), "1", ""));
        assert_eq!(
            entry,
            "[FAIL]\n/c/test/b.lox\n[Validation]\n1\n[Training]\n\n\n------------------------------------\n\n"
        );
    }

    #[test]
    fn aggregator_writes_progress_entries_and_summary() {
        let mut report = Vec::new();
        let mut console = Vec::new();
        let mut aggregator = ReportAggregator::new(&mut report, &mut console, "report.txt");

        let fixtures = [Fixture::new("r/A.src"), Fixture::new("r/B.src")];
        aggregator
            .begin_fixture(0, 2, &fixtures[0])
            .expect("progress");
        aggregator
            .record(Verdict::pass(fixtures[0].clone()))
            .expect("record pass");
        aggregator
            .begin_fixture(1, 2, &fixtures[1])
            .expect("progress");
        aggregator
            .record(Verdict::fail(fixtures[1].clone(), "1", "2"))
            .expect("record fail");
        assert_eq!(aggregator.summary().total(), 2);

        let summary = aggregator.finalize().expect("finalize");
        assert_eq!((summary.passed, summary.failed), (1, 1));

        let console = String::from_utf8(console).expect("utf8 console");
        assert_eq!(
            console,
            "Running test 1 of 2 r/A.src... [PASS]\n\
             Running test 2 of 2 r/B.src... [FAIL]\n\
             Passed 1. Failed 1.\n"
        );

        let report = String::from_utf8(report).expect("utf8 report");
        assert!(report.starts_with("[PASS]\nr/A.src\n"));
        assert!(report.contains("[FAIL]\nr/B.src\n[Validation]\n1\n[Training]\n2\n"));
        assert!(report.ends_with("------------------------------------\n\nPassed 1. Failed 1."));
    }

    #[test]
    fn empty_run_still_reports_zero_counts() {
        let mut report = Vec::new();
        let aggregator = ReportAggregator::new(&mut report, Vec::new(), "report.txt");
        let summary = aggregator.finalize().expect("finalize");

        assert_eq!(summary.total(), 0);
        assert_eq!(report, b"Passed 0. Failed 0.");
    }

    #[test]
    fn create_truncates_previous_report() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("test_results.txt");
        fs::write(&path, "stale content from an earlier run\n").expect("seed report");

        let aggregator = ReportAggregator::create(&path).expect("report should open");
        aggregator.finalize().expect("finalize");

        assert_eq!(
            fs::read_to_string(&path).expect("report readable"),
            "Passed 0. Failed 0."
        );
    }
}
