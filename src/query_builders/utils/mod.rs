// src/query_builders/utils/mod.rs
//! Placeholder and condition helpers shared by the builders

/// Positional placeholder for the 1-based parameter index
#[inline]
pub fn placeholder(position: usize) -> String {
    format!("${}", position)
}

/// Joins conditions with AND behind a WHERE keyword.
///
/// Empty fragments are dropped; no conditions yields an empty string so the
/// caller can splice the result unconditionally.
pub fn where_clause<S: AsRef<str>>(conditions: &[S]) -> String {
    let joined = conditions
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" AND ");

    if joined.is_empty() {
        joined
    } else {
        format!("WHERE {}", joined)
    }
}

/// Wraps a search term in `%...%` unless the caller already supplied wildcards
pub fn like_pattern(term: &str) -> String {
    if term.contains('%') {
        term.to_string()
    } else {
        format!("%{}%", term)
    }
}
