//! Requesting-client context and restrictive in-app browser detection.

/// User-agent substrings identifying in-app browsers known to block or
/// interfere with automatic redirects.
const RESTRICTIVE_AGENT_SIGNATURES: &[&str] = &["micromessenger"];

/// Returns true when the user-agent string belongs to a restrictive in-app
/// browser. Pure function, kept separate from the route-segment table.
pub fn is_restrictive_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    RESTRICTIVE_AGENT_SIGNATURES.iter().any(|s| ua.contains(s))
}

/// Per-request client context shared by creation and resolution.
///
/// `restrictive_flag` is the caller's explicit claim (request field or query
/// parameter) and wins over user-agent sniffing when present.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub user_agent: Option<String>,
    pub source_address: Option<String>,
    pub restrictive_flag: Option<bool>,
}

impl ClientContext {
    pub fn is_restrictive(&self) -> bool {
        if let Some(flag) = self.restrictive_flag {
            return flag;
        }
        self.user_agent
            .as_deref()
            .is_some_and(is_restrictive_user_agent)
    }
}
