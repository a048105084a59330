//! Submitted-content classification: URL versus plain text.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Permissive match for bare domain-like strings (`example.com`,
/// `www.example.com/path`, optionally with a port). Anything the strict
/// parser rejects gets one chance here before being treated as text.
static BARE_DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9-]+\.)+[A-Za-z]{2,}(:\d+)?(/\S*)?$").unwrap()
});

/// Outcome of classifying submitted content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// URL content with its normalized absolute form (scheme always present).
    Url { normalized: String },
    /// Anything that is not a URL.
    Text,
}

/// Classifies raw submitted content.
///
/// Strict parsing first: input that parses as an absolute `http`/`https` URL
/// is taken as-is. Otherwise a domain-like string is normalized by prefixing
/// `https://`. Everything else is text.
pub fn classify_content(raw: &str) -> Classified {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Classified::Text;
    }

    if let Ok(url) = Url::parse(trimmed)
        && matches!(url.scheme(), "http" | "https")
    {
        return Classified::Url {
            normalized: trimmed.to_string(),
        };
    }

    if BARE_DOMAIN_REGEX.is_match(trimmed) {
        let normalized = format!("https://{trimmed}");
        // The prefixed form must survive strict parsing to count as a URL.
        if Url::parse(&normalized).is_ok() {
            return Classified::Url { normalized };
        }
    }

    Classified::Text
}
