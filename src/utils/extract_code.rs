//! Short-code extraction from request paths.

use regex::Regex;
use std::sync::LazyLock;

/// Route prefixes recognized on incoming paths, in priority order. Earlier
/// entries win when more than one could structurally match.
const ROUTE_PREFIXES: &[&str] = &["go", "share", "s", "link", "l", "view", "v", "article", "a"];

static ROUTE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ROUTE_PREFIXES
        .iter()
        .map(|prefix| Regex::new(&format!(r"/{prefix}/([A-Za-z0-9]+)")).unwrap())
        .collect()
});

/// Extracts a short code from a request path.
///
/// Tries each route-prefix pattern in priority order, then falls back to the
/// last path segment. The caller passes a bare path; any query string has
/// already been stripped and never affects extraction.
pub fn extract_code(path: &str) -> Option<String> {
    for pattern in ROUTE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(path) {
            return Some(captures[1].to_string());
        }
    }

    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_string())
}
