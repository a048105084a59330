//! Short-code resolution service.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::client_context::ClientContext;
use crate::domain::entities::ContentKind;
use crate::domain::repositories::LinkRepository;
use crate::domain::scan_event::ScanEvent;
use crate::error::AppError;
use crate::utils::extract_code::extract_code;

/// How a resolved request should be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Plain 302 redirect to the stored destination.
    Redirect { location: String },
    /// Interstitial page with manual navigation, for restrictive in-app
    /// browsers where automatic redirects are unreliable.
    Interstitial { destination: String },
    /// Raw text render for a text-kind entry.
    Text { content: String },
    /// Unknown, expired, or deactivated code. Intentionally identical for
    /// all three causes.
    NotFound,
}

/// Service resolving request paths to redirect responses.
///
/// Visit recording is fire-and-forget: events go onto a bounded channel and
/// the response is never made to wait on the write.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    scan_tx: mpsc::Sender<ScanEvent>,
}

impl RedirectService {
    pub fn new(links: Arc<dyn LinkRepository>, scan_tx: mpsc::Sender<ScanEvent>) -> Self {
        Self { links, scan_tx }
    }

    /// Resolves a request path to a response shape.
    ///
    /// Extracts the code from the path, enforces the active/expiry state
    /// (lazily deactivating an entry found past its expiry), enqueues a scan
    /// event, and selects the response for the client context.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on lookup failures; callers render the
    /// same page as for [`Resolution::NotFound`].
    pub async fn resolve(
        &self,
        path: &str,
        ctx: &ClientContext,
    ) -> Result<Resolution, AppError> {
        let Some(code) = extract_code(path) else {
            return Ok(Resolution::NotFound);
        };

        let Some(link) = self.links.find_by_code(&code).await? else {
            tracing::debug!(%code, "unknown short code");
            return Ok(Resolution::NotFound);
        };

        if !link.is_resolvable() {
            // Lazy expiry: materialize the inactive state on first access
            // past the deadline. The client response is the same either way.
            if link.is_active {
                if let Err(e) = self.links.deactivate(&link.code).await {
                    tracing::warn!(code = %link.code, error = %e, "failed to deactivate expired link");
                }
            }
            return Ok(Resolution::NotFound);
        }

        let event = ScanEvent::new(
            link.id,
            ctx.user_agent.as_deref(),
            ctx.source_address.clone(),
            ctx.is_restrictive(),
        );
        if let Err(e) = self.scan_tx.try_send(event) {
            tracing::warn!(code = %link.code, error = %e, "scan queue full, dropping visit");
        }

        Ok(match link.content_kind {
            ContentKind::Text => Resolution::Text {
                content: link.payload,
            },
            ContentKind::Url if ctx.is_restrictive() => Resolution::Interstitial {
                destination: link.payload,
            },
            ContentKind::Url => Resolution::Redirect {
                location: link.payload,
            },
        })
    }
}
