use crate::domain::Fixture;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
const POLL_INTERVAL_MILLIS: u64 = 10;

/// Program plus leading arguments. The fixture path is always appended as the
/// final argument when the invocation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Launcher command (whitespace separated, e.g. `java -jar`) followed by
    /// the reference artifact. Returns `None` for a blank launcher.
    pub fn reference(launcher: &str, artifact: impl Into<String>) -> Option<Self> {
        let mut tokens = launcher.split_whitespace().map(str::to_string);
        let program = tokens.next()?;
        let mut args = tokens.collect::<Vec<_>>();
        args.push(artifact.into());
        Some(Self::new(program, args))
    }

    pub fn candidate(executable: impl Into<String>) -> Self {
        Self::new(executable, Vec::new())
    }

    pub fn command_line(&self, fixture: &Fixture) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(std::iter::once(fixture.path()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },
    #[error("failed to capture output of '{program}': {source}")]
    Capture {
        program: String,
        source: std::io::Error,
    },
    #[error("failed while waiting for '{program}': {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
    #[error("'{program}' did not finish within {timeout:?} and was killed")]
    Timeout { program: String, timeout: Duration },
}

pub trait ProcessExecutor {
    /// Returns stdout and stderr merged in write order, decoded lossily.
    fn execute(&self, invocation: &Invocation, fixture: &Fixture) -> Result<String, ProcessError>;
}

/// Runs real child processes with empty stdin and stderr merged into stdout.
///
/// Both streams of the child point at one anonymous temporary file, so the
/// captured text keeps the order in which the interpreter wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemProcessExecutor {
    timeout: Option<Duration>,
}

impl SystemProcessExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// `0` disables the timeout.
    pub fn with_timeout_secs(seconds: u64) -> Self {
        Self::new((seconds > 0).then(|| Duration::from_secs(seconds)))
    }

    fn wait_for_child(&self, child: &mut Child, program: &str) -> Result<ExitStatus, ProcessError> {
        let wait_error = |source| ProcessError::Wait {
            program: program.to_string(),
            source,
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(wait_error);
        };

        let started_at = Instant::now();
        let poll_interval = Duration::from_millis(POLL_INTERVAL_MILLIS);
        loop {
            if let Some(status) = child.try_wait().map_err(wait_error)? {
                return Ok(status);
            }
            if started_at.elapsed() >= timeout {
                let _ = child.kill();
                child.wait().map_err(wait_error)?;
                return Err(ProcessError::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
            thread::sleep(poll_interval);
        }
    }
}

impl Default for SystemProcessExecutor {
    fn default() -> Self {
        Self::with_timeout_secs(DEFAULT_TIMEOUT_SECS)
    }
}

impl ProcessExecutor for SystemProcessExecutor {
    fn execute(&self, invocation: &Invocation, fixture: &Fixture) -> Result<String, ProcessError> {
        let program = invocation.program.as_str();
        let capture_error = |source| ProcessError::Capture {
            program: program.to_string(),
            source,
        };

        let mut capture = tempfile::tempfile().map_err(capture_error)?;
        let stdout = capture.try_clone().map_err(capture_error)?;
        let stderr = capture.try_clone().map_err(capture_error)?;

        tracing::debug!(command = %invocation.command_line(fixture), "spawning interpreter");
        let started_at = Instant::now();
        let mut child = Command::new(program)
            .args(&invocation.args)
            .arg(fixture.as_path())
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|source| ProcessError::Launch {
                program: program.to_string(),
                source,
            })?;

        let status = self.wait_for_child(&mut child, program)?;
        let elapsed = started_at.elapsed();
        let text = read_capture(&mut capture).map_err(capture_error)?;

        tracing::debug!(
            program,
            exit_code = ?status.code(),
            elapsed_ms = elapsed.as_millis() as u64,
            "interpreter finished"
        );
        Ok(text)
    }
}

fn read_capture(capture: &mut File) -> std::io::Result<String> {
    capture.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    capture.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reference,
    Candidate,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Reference => "reference",
            Self::Candidate => "candidate",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualOutput {
    pub reference: String,
    pub candidate: String,
}

/// One side of a fixture could not be executed.
#[derive(Debug)]
pub struct FixtureFault {
    pub side: Side,
    /// Reference output captured before the fault, empty if the reference
    /// itself faulted.
    pub reference: String,
    pub error: ProcessError,
}

impl FixtureFault {
    /// `<side> interpreter fault: <error>`; the error names the program.
    pub fn description(&self) -> String {
        format!("{} interpreter fault: {}", self.side, self.error)
    }
}

/// Runs the reference interpreter, then the candidate, against one fixture.
pub struct DualProcessRunner<E> {
    executor: E,
    reference: Invocation,
    candidate: Invocation,
}

impl<E: ProcessExecutor> DualProcessRunner<E> {
    pub fn new(executor: E, reference: Invocation, candidate: Invocation) -> Self {
        Self {
            executor,
            reference,
            candidate,
        }
    }

    pub fn execute(&self, fixture: &Fixture) -> Result<DualOutput, FixtureFault> {
        let reference = self
            .executor
            .execute(&self.reference, fixture)
            .map_err(|error| FixtureFault {
                side: Side::Reference,
                reference: String::new(),
                error,
            })?;

        match self.executor.execute(&self.candidate, fixture) {
            Ok(candidate) => Ok(DualOutput {
                reference,
                candidate,
            }),
            Err(error) => Err(FixtureFault {
                side: Side::Candidate,
                reference,
                error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DualProcessRunner, Invocation, ProcessError, ProcessExecutor, Side, SystemProcessExecutor,
    };
    use crate::domain::Fixture;
    use std::cell::RefCell;
    use std::time::Duration;

    #[test]
    fn reference_invocation_splits_launcher_and_appends_artifact() {
        let invocation = Invocation::reference("java -jar", "/corpus/gen/m/m.jar")
            .expect("launcher should parse");
        assert_eq!(invocation.program, "java");
        assert_eq!(invocation.args, ["-jar", "/corpus/gen/m/m.jar"]);
        assert_eq!(
            invocation.command_line(&Fixture::new("/corpus/test/a.lox")),
            "java -jar /corpus/gen/m/m.jar /corpus/test/a.lox"
        );
        assert!(Invocation::reference("   ", "x.jar").is_none());
    }

    struct RecordingExecutor {
        calls: RefCell<Vec<String>>,
        fail_program: Option<&'static str>,
    }

    impl ProcessExecutor for RecordingExecutor {
        fn execute(
            &self,
            invocation: &Invocation,
            fixture: &Fixture,
        ) -> Result<String, ProcessError> {
            self.calls.borrow_mut().push(invocation.program.clone());
            if self.fail_program == Some(invocation.program.as_str()) {
                return Err(ProcessError::Launch {
                    program: invocation.program.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            Ok(format!("{} ran {}", invocation.program, fixture.path()))
        }
    }

    fn runner(fail_program: Option<&'static str>) -> DualProcessRunner<RecordingExecutor> {
        DualProcessRunner::new(
            RecordingExecutor {
                calls: RefCell::new(Vec::new()),
                fail_program,
            },
            Invocation::new("ref", vec!["ref.jar".to_string()]),
            Invocation::candidate("cand"),
        )
    }

    #[test]
    fn reference_runs_before_candidate() {
        let runner = runner(None);
        let output = runner
            .execute(&Fixture::new("a.lox"))
            .expect("both sides should run");

        assert_eq!(output.reference, "ref ran a.lox");
        assert_eq!(output.candidate, "cand ran a.lox");
        assert_eq!(*runner.executor.calls.borrow(), ["ref", "cand"]);
    }

    #[test]
    fn reference_fault_skips_candidate() {
        let runner = runner(Some("ref"));
        let fault = runner
            .execute(&Fixture::new("a.lox"))
            .expect_err("reference should fault");

        assert_eq!(fault.side, Side::Reference);
        assert!(fault.reference.is_empty());
        assert!(fault.description().starts_with("reference interpreter fault:"));
        assert_eq!(*runner.executor.calls.borrow(), ["ref"]);
    }

    #[test]
    fn candidate_fault_keeps_reference_output() {
        let runner = runner(Some("cand"));
        let fault = runner
            .execute(&Fixture::new("a.lox"))
            .expect_err("candidate should fault");

        assert_eq!(fault.side, Side::Candidate);
        assert_eq!(fault.reference, "ref ran a.lox");
        let description = fault.description();
        assert!(description.starts_with("candidate interpreter fault: failed to launch 'cand':"));
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_merges_streams_in_write_order() {
        let executor = SystemProcessExecutor::with_timeout_secs(30);
        let invocation = Invocation::new(
            "sh",
            vec![
                "-c".to_string(),
                "printf 'one\\n'; printf 'two\\n' >&2; printf 'three\\n'; exit 3".to_string(),
            ],
        );

        let text = executor
            .execute(&invocation, &Fixture::new("fixture.lox"))
            .expect("sh should run");
        assert_eq!(text, "one\ntwo\nthree\n");
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_passes_fixture_as_last_argument_with_empty_stdin() {
        let executor = SystemProcessExecutor::new(None);
        let invocation = Invocation::new(
            "sh",
            vec!["-c".to_string(), "printf '%s|' \"$0\"; cat".to_string()],
        );

        let text = executor
            .execute(&invocation, &Fixture::new("dir/fixture.lox"))
            .expect("sh should run");
        assert_eq!(text, "dir/fixture.lox|");
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_kills_processes_past_the_timeout() {
        let executor = SystemProcessExecutor::new(Some(Duration::from_millis(200)));
        let invocation = Invocation::new("sh", vec!["-c".to_string(), "sleep 10".to_string()]);

        let error = executor
            .execute(&invocation, &Fixture::new("fixture.lox"))
            .expect_err("sleep should time out");
        assert!(matches!(error, ProcessError::Timeout { .. }));
        assert_eq!(
            error.to_string(),
            "'sh' did not finish within 200ms and was killed"
        );
    }

    #[test]
    fn system_executor_reports_missing_programs_as_launch_failures() {
        let executor = SystemProcessExecutor::default();
        let invocation = Invocation::candidate("/nonexistent/conform/interpreter");

        let error = executor
            .execute(&invocation, &Fixture::new("fixture.lox"))
            .expect_err("missing program should fail");
        assert!(matches!(error, ProcessError::Launch { .. }));
    }
}
