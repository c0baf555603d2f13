//! Static milestone table.
//!
//! Maps milestone names to the ordered fixture entries they exercise and to the
//! reference artifact the launcher runs. The default table is compiled in from
//! `milestones.json`; an external file with the same shape can replace it.

use crate::domain::{ConformError, Milestone};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const EMBEDDED_TABLE: &str = include_str!("milestones.json");
const EMBEDDED_SOURCE: &str = "<embedded milestones.json>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneTable {
    milestones: Vec<Milestone>,
}

#[derive(Debug, thiserror::Error)]
pub enum MilestoneTableError {
    #[error("failed to read milestone table '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse milestone table '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("milestone table '{}' contains an entry with an empty name", path.display())]
    EmptyName { path: PathBuf },
    #[error("milestone table '{}' declares milestone '{name}' more than once", path.display())]
    DuplicateName { path: PathBuf, name: String },
}

impl From<MilestoneTableError> for ConformError {
    fn from(error: MilestoneTableError) -> Self {
        let message = error.to_string();
        match error {
            MilestoneTableError::Read { .. } => {
                ConformError::io_system("IO.MILESTONE_TABLE", message)
            }
            MilestoneTableError::Parse { .. }
            | MilestoneTableError::EmptyName { .. }
            | MilestoneTableError::DuplicateName { .. } => {
                ConformError::input_validation("INPUT.MILESTONE_TABLE", message)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMilestoneTable {
    #[serde(default)]
    milestones: Vec<RawMilestone>,
}

#[derive(Debug, Deserialize)]
struct RawMilestone {
    name: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    fixtures: Vec<String>,
}

impl MilestoneTable {
    pub fn embedded() -> Result<Self, MilestoneTableError> {
        Self::from_json(EMBEDDED_TABLE, Path::new(EMBEDDED_SOURCE))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MilestoneTableError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MilestoneTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, path)
    }

    pub fn from_json(json: &str, source_path: &Path) -> Result<Self, MilestoneTableError> {
        let parse_error = |source| MilestoneTableError::Parse {
            path: source_path.to_path_buf(),
            source,
        };
        let raw: RawMilestoneTable = serde_json::from_str(json).map_err(parse_error)?;

        let mut seen = BTreeSet::new();
        let mut milestones = Vec::with_capacity(raw.milestones.len());
        for entry in raw.milestones {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return Err(MilestoneTableError::EmptyName {
                    path: source_path.to_path_buf(),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(MilestoneTableError::DuplicateName {
                    path: source_path.to_path_buf(),
                    name,
                });
            }

            let reference = entry
                .reference
                .unwrap_or_else(|| Milestone::default_reference_artifact(&name));
            milestones.push(Milestone::new(name, reference, entry.fixtures));
        }

        Ok(Self { milestones })
    }

    pub fn get(&self, name: &str) -> Option<&Milestone> {
        self.milestones
            .iter()
            .find(|milestone| milestone.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Milestone> {
        self.milestones.iter()
    }
}
