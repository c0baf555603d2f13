pub mod comparator;
pub mod controller;
pub mod report;
pub mod resolver;
pub mod runner;

pub use comparator::{Comparison, compare, compare_text};
pub use controller::{
    DEFAULT_LAUNCHER, PreparedRun, RunController, RunRequest, RunSettings, validate_args,
};
pub use report::{DEFAULT_REPORT_PATH, ReportAggregator, ReportError};
pub use resolver::{lookup_milestone, resolve, resolve_fixtures};
pub use runner::{
    DEFAULT_TIMEOUT_SECS, DualOutput, DualProcessRunner, FixtureFault, Invocation, ProcessError,
    ProcessExecutor, Side, SystemProcessExecutor,
};
