//! Short link entity: an expiring code mapped to destination content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of content a short link points at.
///
/// Only `Url` rows are created by this service; `Text` stays in the model so
/// a row carrying raw text still resolves to a readable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Url,
    Text,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Text => "text",
        }
    }

    /// Anything unrecognized is treated as a URL row.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            _ => Self::Url,
        }
    }
}

/// Route style used to build the public-facing redirect path.
///
/// Each style has a normal spelling and a compact one; the compact spelling
/// is selected when the creating context is a restrictive in-app browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    Go,
    Share,
    Link,
    View,
    Article,
}

impl RouteStyle {
    /// Default style when a creation request carries no route hint.
    pub const DEFAULT: RouteStyle = RouteStyle::Go;

    /// Path segment for this style: (normal, compact) lookup.
    pub fn path_segment(&self, compact: bool) -> &'static str {
        match (self, compact) {
            (Self::Go, _) => "go",
            (Self::Share, false) => "share",
            (Self::Share, true) => "s",
            (Self::Link, false) => "link",
            (Self::Link, true) => "l",
            (Self::View, false) => "view",
            (Self::View, true) => "v",
            (Self::Article, false) => "article",
            (Self::Article, true) => "a",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Share => "share",
            Self::Link => "link",
            Self::View => "view",
            Self::Article => "article",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "go" => Some(Self::Go),
            "share" => Some(Self::Share),
            "link" => Some(Self::Link),
            "view" => Some(Self::View),
            "article" => Some(Self::Article),
            _ => None,
        }
    }
}

/// A short link with its lifecycle state and visit counters.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub id: i64,
    pub code: String,
    pub display_name: String,
    pub content_kind: ContentKind,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub scan_count: i64,
    pub last_scanned_at: Option<DateTime<Utc>>,
    pub route_hint: Option<RouteStyle>,
    pub compact_mode: bool,
}

impl ShortLink {
    /// Returns true once the expiry instant has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Active and unexpired: the only state that resolves.
    pub fn is_resolvable(&self) -> bool {
        self.is_active && !self.is_expired()
    }
}

/// Input data for persisting a new short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub code: String,
    pub display_name: String,
    pub content_kind: ContentKind,
    pub payload: String,
    pub expires_at: DateTime<Utc>,
    pub route_hint: Option<RouteStyle>,
    pub compact_mode: bool,
}
