/// Outcome of comparing one reference capture against one candidate capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub passed: bool,
    pub reference: String,
    pub candidate: String,
}

/// Trims outer whitespace on each side independently, then requires exact
/// equality. Internal blank lines and line endings are not normalized.
pub fn compare(reference: Option<&str>, candidate: Option<&str>) -> Comparison {
    let reference = normalize(reference);
    let candidate = normalize(candidate);
    Comparison {
        passed: reference == candidate,
        reference,
        candidate,
    }
}

pub fn compare_text(reference: &str, candidate: &str) -> Comparison {
    compare(Some(reference), Some(candidate))
}

fn normalize(text: Option<&str>) -> String {
    text.map(str::trim).unwrap_or_default().to_string()
}
