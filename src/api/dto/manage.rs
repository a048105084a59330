//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ContentKind, RouteStyle, ShortLink};

/// One active link in the manage listing.
#[derive(Debug, Serialize)]
pub struct LinkSummary {
    pub code: String,
    pub display_name: String,
    pub content_kind: ContentKind,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub scan_count: i64,
    pub last_scanned_at: Option<DateTime<Utc>>,
    pub route: Option<RouteStyle>,
    pub compact_mode: bool,
}

impl From<ShortLink> for LinkSummary {
    fn from(link: ShortLink) -> Self {
        Self {
            code: link.code,
            display_name: link.display_name,
            content_kind: link.content_kind,
            payload: link.payload,
            created_at: link.created_at,
            expires_at: link.expires_at,
            scan_count: link.scan_count,
            last_scanned_at: link.last_scanned_at,
            route: link.route_hint,
            compact_mode: link.compact_mode,
        }
    }
}

/// Request to deactivate a code.
///
/// `code` is optional at the serde level so a missing field reports as a 400
/// validation error rather than a body-rejection status.
#[derive(Debug, Deserialize)]
pub struct DeleteLinkRequest {
    pub code: Option<String>,
}

/// Deactivation acknowledgement. Deactivation is idempotent, so `success`
/// reflects only that the request was processed.
#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub success: bool,
}
