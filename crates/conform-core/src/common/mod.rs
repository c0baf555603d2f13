pub mod config;
pub mod milestones;

pub use config::{DEFAULT_CORPUS_CONFIG_PATH, load_corpus_root};
pub use milestones::{MilestoneTable, MilestoneTableError};
