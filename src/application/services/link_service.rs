//! Link creation and management service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::json;

use crate::domain::client_context::ClientContext;
use crate::domain::entities::{ContentKind, NewShortLink, RouteStyle, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::classify::{Classified, classify_content};
use crate::utils::code_generator::generate_code;
use crate::utils::display_name::next_display_name;
use crate::utils::request_origin::RequestOrigin;

/// Insert attempts before allocation gives up.
const MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// Query strings occasionally appended to public URLs created for
/// restrictive in-app browser contexts, so the links resemble organically
/// shared ones. Cosmetic only: resolution ignores any query string.
const DISGUISE_PARAMS: &[&str] = &[
    "from=singlemessage",
    "from=timeline",
    "from=groupmessage",
    "isappinstalled=0",
];

/// Result of a creation request.
#[derive(Debug)]
pub enum CreationOutcome {
    /// Plain-text content is echoed back; no registry entry is created.
    Text { content: String },
    /// URL content was registered under a fresh short code.
    Url(CreatedLink),
}

/// A freshly registered link together with its public-facing URL.
#[derive(Debug)]
pub struct CreatedLink {
    pub link: ShortLink,
    pub short_url: String,
}

/// Service for creating short links and managing the active set.
///
/// Holds an injected registry handle; uniqueness comes from the storage
/// layer's unique index on live codes, with allocation retrying on insert
/// conflict rather than pre-checking.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self { links }
    }

    /// Creates a short link from raw submitted content.
    ///
    /// Runs the inline expiry sweep, classifies the content, and for URLs
    /// allocates a code, computes the next display name, and composes the
    /// public URL from the request origin plus the chosen route segment.
    /// Text content is returned as-is without touching the registry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when URL content arrives without a
    /// positive `expires_in_minutes`, [`AppError::AllocationExhausted`] when
    /// the retry budget is spent, and [`AppError::Internal`] on storage
    /// failures. An entry is either fully persisted or not created.
    pub async fn create(
        &self,
        content: &str,
        expires_in_minutes: Option<i64>,
        route_hint: Option<RouteStyle>,
        ctx: &ClientContext,
        origin: &RequestOrigin,
    ) -> Result<CreationOutcome, AppError> {
        self.sweep_expired().await?;

        let normalized = match classify_content(content) {
            Classified::Text => {
                return Ok(CreationOutcome::Text {
                    content: content.to_string(),
                });
            }
            Classified::Url { normalized } => normalized,
        };

        let minutes = expires_in_minutes.ok_or_else(|| {
            AppError::bad_request(
                "expires_in_minutes is required for URL content",
                json!({ "field": "expires_in_minutes" }),
            )
        })?;
        if minutes <= 0 {
            return Err(AppError::bad_request(
                "expires_in_minutes must be positive",
                json!({ "provided": minutes }),
            ));
        }

        let expires_at = Utc::now() + Duration::minutes(minutes);
        let display_name =
            next_display_name(self.links.latest_display_name().await?.as_deref());
        let route = route_hint.unwrap_or(RouteStyle::DEFAULT);
        let compact = ctx.is_restrictive();

        let link = self
            .allocate(normalized, display_name, expires_at, route, compact)
            .await?;

        let mut short_url =
            origin.url_for(&format!("{}/{}", route.path_segment(compact), link.code));
        if compact {
            short_url.push('?');
            short_url.push_str(pick_disguise_param());
        }

        Ok(CreationOutcome::Url(CreatedLink { link, short_url }))
    }

    /// Active, unexpired links for the manage listing, after the sweep.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failures.
    pub async fn list_active(&self) -> Result<Vec<ShortLink>, AppError> {
        self.sweep_expired().await?;
        self.links.list_active().await
    }

    /// Idempotently deactivates a code. Returns whether a live row was hit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failures.
    pub async fn deactivate(&self, code: &str) -> Result<bool, AppError> {
        self.links.deactivate(code).await
    }

    async fn sweep_expired(&self) -> Result<(), AppError> {
        let swept = self.links.deactivate_expired().await?;
        if swept > 0 {
            tracing::debug!(swept, "deactivated expired links");
        }
        Ok(())
    }

    /// Insert-with-retry allocation: each attempt samples a fresh code and
    /// lets the storage uniqueness constraint arbitrate collisions.
    async fn allocate(
        &self,
        payload: String,
        display_name: String,
        expires_at: chrono::DateTime<Utc>,
        route: RouteStyle,
        compact: bool,
    ) -> Result<ShortLink, AppError> {
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let candidate = NewShortLink {
                code: generate_code(),
                display_name: display_name.clone(),
                content_kind: ContentKind::Url,
                payload: payload.clone(),
                expires_at,
                route_hint: Some(route),
                compact_mode: compact,
            };

            match self.links.insert(candidate).await {
                Ok(link) => return Ok(link),
                Err(e) if e.is_conflict() => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::AllocationExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }
}

fn pick_disguise_param() -> &'static str {
    let mut rng = rand::rng();
    DISGUISE_PARAMS[rng.random_range(0..DISGUISE_PARAMS.len())]
}
