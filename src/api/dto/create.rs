//! DTOs for the link creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreatedLink, CreationOutcome};
use crate::domain::entities::RouteStyle;

/// Request to register submitted content.
///
/// `expires_in_minutes` is only required when the content classifies as a
/// URL; the service enforces that, since classification happens server-side.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Raw submitted content: a URL, a bare domain, or arbitrary text.
    /// Optional at the serde level so a missing field reports as a 400
    /// validation error rather than a body-rejection status.
    pub content: Option<String>,

    /// Relative expiry in minutes, stored as an absolute timestamp.
    #[validate(range(min = 1, message = "expires_in_minutes must be positive"))]
    pub expires_in_minutes: Option<i64>,

    /// Optional route style for the public path segment.
    pub route_hint: Option<RouteStyle>,

    /// Explicit restrictive-in-app-browser claim; overrides user-agent
    /// sniffing when present.
    pub restrictive_context: Option<bool>,
}

/// Creation result; shape depends on how the content classified.
///
/// Uses an untagged enum for cleaner JSON (no discriminator field beyond
/// `is_url`).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateLinkResponse {
    Url {
        is_url: bool,
        code: String,
        display_name: String,
        expires_at: DateTime<Utc>,
        short_url: String,
        long_url: String,
        route: RouteStyle,
        compact_mode: bool,
    },
    Text {
        is_url: bool,
        content: String,
    },
}

impl From<CreationOutcome> for CreateLinkResponse {
    fn from(outcome: CreationOutcome) -> Self {
        match outcome {
            CreationOutcome::Text { content } => Self::Text {
                is_url: false,
                content,
            },
            CreationOutcome::Url(CreatedLink { link, short_url }) => Self::Url {
                is_url: true,
                code: link.code,
                display_name: link.display_name,
                expires_at: link.expires_at,
                short_url,
                long_url: link.payload,
                route: link.route_hint.unwrap_or(RouteStyle::DEFAULT),
                compact_mode: link.compact_mode,
            },
        }
    }
}
