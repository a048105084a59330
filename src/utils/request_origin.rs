//! Request origin recovery for public URL composition.

use axum::http::{HeaderMap, header};
use serde_json::json;
use std::net::SocketAddr;

use crate::error::AppError;

/// Scheme and host the client used to reach the service, recovered from
/// request headers. Used to compose the public-facing redirect URL.
#[derive(Debug, Clone)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    /// Builds a public URL under this origin: `{scheme}://{host}/{path}`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}://{}/{}", self.scheme, self.host, path.trim_start_matches('/'))
    }
}

/// Recovers the request origin from the `Host` and `X-Forwarded-Proto`
/// headers. The scheme defaults to `https` when no proxy header is present.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when the `Host` header is missing or
/// unreadable.
pub fn origin_from_headers(headers: &HeaderMap) -> Result<RequestOrigin, AppError> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?;

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");

    Ok(RequestOrigin {
        scheme: scheme.to_string(),
        host: host.to_string(),
    })
}

/// Best-effort client source address: first `X-Forwarded-For` entry, falling
/// back to the peer socket address.
pub fn source_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    forwarded.or_else(|| peer.map(|addr| addr.ip().to_string()))
}
