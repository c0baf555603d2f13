use crate::common::milestones::MilestoneTable;
use crate::domain::{ConformError, ConformResult, Fixture, Milestone};

/// Looks up `milestone_name` in the table. Unknown names are a configuration
/// error and must abort the run before anything executes.
pub fn lookup_milestone<'a>(
    table: &'a MilestoneTable,
    milestone_name: &str,
) -> ConformResult<&'a Milestone> {
    table.get(milestone_name).ok_or_else(|| {
        ConformError::input_validation(
            "INPUT.UNKNOWN_MILESTONE",
            format!("unexpected milestone '{}'", milestone_name),
        )
    })
}

/// Joins every configured entry onto `corpus_root` with a forward slash,
/// keeping configured order and duplicates. Fixture existence is not checked.
pub fn resolve_fixtures(milestone: &Milestone, corpus_root: &str) -> Vec<Fixture> {
    milestone
        .fixtures
        .iter()
        .map(|entry| Fixture::new(join_corpus_path(corpus_root, entry)))
        .collect()
}

pub fn resolve(
    table: &MilestoneTable,
    milestone_name: &str,
    corpus_root: &str,
) -> ConformResult<Vec<Fixture>> {
    let milestone = lookup_milestone(table, milestone_name)?;
    Ok(resolve_fixtures(milestone, corpus_root))
}

pub fn join_corpus_path(corpus_root: &str, relative: &str) -> String {
    format!("{}/{}", corpus_root, relative)
}
