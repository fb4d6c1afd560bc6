use std::cmp::Ordering;

/// Loose sort key: every alphanumeric run, non-numeric runs counting as 0.
pub fn version_sort_key(version: &str) -> Vec<u64> {
    version
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>().unwrap_or(0))
        .collect()
}

/// Newest first, ties broken on the raw string.
pub fn newest_first(a: &str, b: &str) -> Ordering {
    version_sort_key(b)
        .cmp(&version_sort_key(a))
        .then_with(|| b.cmp(a))
}

/// Strict dotted-numeric parse; `None` for snapshots and other non-release ids.
pub fn numeric_components(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

/// `Some(true)` when `version <= max`, component-wise with missing parts as 0.
pub fn is_at_most(version: &str, max: &str) -> Option<bool> {
    let mut lhs = numeric_components(version)?;
    let mut rhs = numeric_components(max)?;
    let len = lhs.len().max(rhs.len());
    lhs.resize(len, 0);
    rhs.resize(len, 0);
    Some(lhs <= rhs)
}
