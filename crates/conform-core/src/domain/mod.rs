pub mod errors;

pub use errors::{ConformError, ConformErrorCategory, ConformResult};

use std::fmt::{Display, Formatter};
use std::path::Path;

/// A named, ordered subset of the fixture corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub name: String,
    /// Reference artifact, relative to the corpus root.
    pub reference_artifact: String,
    /// Fixture entries, relative to the corpus root. Order is significant and
    /// duplicates are kept.
    pub fixtures: Vec<String>,
}

impl Milestone {
    pub fn new(
        name: impl Into<String>,
        reference_artifact: impl Into<String>,
        fixtures: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reference_artifact: reference_artifact.into(),
            fixtures,
        }
    }

    pub fn default_reference_artifact(name: &str) -> String {
        format!("gen/{name}/{name}.jar")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    path: String,
}

impl Fixture {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail { reference: String, candidate: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub fixture: Fixture,
    pub outcome: Outcome,
}

impl Verdict {
    pub fn pass(fixture: Fixture) -> Self {
        Self {
            fixture,
            outcome: Outcome::Pass,
        }
    }

    pub fn fail(
        fixture: Fixture,
        reference: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        Self {
            fixture,
            outcome: Outcome::Fail {
                reference: reference.into(),
                candidate: candidate.into(),
            },
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Pass)
    }

    pub const fn marker(&self) -> &'static str {
        match self.outcome {
            Outcome::Pass => "[PASS]",
            Outcome::Fail { .. } => "[FAIL]",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub verdicts: Vec<Verdict>,
}

impl RunSummary {
    pub fn record(&mut self, verdict: Verdict) {
        if verdict.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.verdicts.push(verdict);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn summary_line(&self) -> String {
        format!("Passed {}. Failed {}.", self.passed, self.failed)
    }
}
