//! Small text helpers for resource paths and fetch errors.

const ERROR_BODY_CHARS: usize = 180;

/// Trimmed `value`, or `None` when nothing is left.
pub fn non_empty_trimmed(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// One-line excerpt of a response body for error messages. Whitespace runs
/// (including the newlines of an HTML error page) collapse to one space.
pub fn compact_body(body: &str) -> String {
    body.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(ERROR_BODY_CHARS)
        .collect()
}

/// Last path segment of a resource path (`notes/a.md` -> `a.md`).
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
