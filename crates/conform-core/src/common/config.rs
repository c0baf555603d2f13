//! Corpus-root configuration file.
//!
//! The file holds a single line naming the fixture corpus directory. Only the
//! first non-empty line is read; surrounding whitespace is dropped.

use crate::domain::{ConformError, ConformResult};
use std::fs;
use std::path::Path;

pub const DEFAULT_CORPUS_CONFIG_PATH: &str = "env";

pub fn load_corpus_root(config_path: &Path) -> ConformResult<String> {
    let content = fs::read_to_string(config_path).map_err(|source| {
        ConformError::io_system(
            "IO.CORPUS_CONFIG",
            format!(
                "failed to read corpus root config '{}': {}",
                config_path.display(),
                source
            ),
        )
    })?;

    parse_corpus_root(&content).ok_or_else(|| {
        ConformError::input_validation(
            "INPUT.CORPUS_CONFIG",
            format!(
                "corpus root config '{}' does not name a directory",
                config_path.display()
            ),
        )
    })
}

fn parse_corpus_root(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
