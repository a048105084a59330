//! Scan entity: one recorded visit to a short link.

use chrono::{DateTime, Utc};

/// Longest user-agent string persisted with a scan.
pub const USER_AGENT_MAX_LEN: usize = 500;

/// Longest source-address string persisted with a scan.
pub const SOURCE_ADDRESS_MAX_LEN: usize = 100;

/// Input data for appending a scan event.
///
/// Scan rows are pure history: inserted once, never updated or deleted.
/// Client-supplied strings are truncated to their column bounds on
/// construction.
#[derive(Debug, Clone)]
pub struct NewScan {
    pub user_agent: Option<String>,
    pub source_address: Option<String>,
    pub is_restrictive: bool,
    pub scanned_at: DateTime<Utc>,
}

impl NewScan {
    pub fn new(
        user_agent: Option<String>,
        source_address: Option<String>,
        is_restrictive: bool,
        scanned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_agent: user_agent.map(|s| truncate(s, USER_AGENT_MAX_LEN)),
            source_address: source_address.map(|s| truncate(s, SOURCE_ADDRESS_MAX_LEN)),
            is_restrictive,
            scanned_at,
        }
    }
}

fn truncate(s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    // Back off to a char boundary so multi-byte agents cannot panic us.
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}
