//! Handlers for the link management endpoints.

use axum::{Json, extract::State};
use serde_json::json;

use crate::api::dto::manage::{DeleteLinkRequest, DeleteLinkResponse, LinkSummary};
use crate::error::AppError;
use crate::state::AppState;

/// Lists active, unexpired links (newest first).
///
/// # Endpoint
///
/// `GET /api/links`
///
/// The inline expiry sweep runs first, so entries past their deadline never
/// appear in the listing.
///
/// # Errors
///
/// Returns 500 on storage failure.
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkSummary>>, AppError> {
    let links = state.link_service.list_active().await?;

    Ok(Json(links.into_iter().map(LinkSummary::from).collect()))
}

/// Deactivates a link by code.
///
/// # Endpoint
///
/// `DELETE /api/links`
///
/// # Request Body
///
/// ```json
/// { "code": "Ab3dEf9h" }
/// ```
///
/// The row is never removed; `is_active` is set false and the code stops
/// resolving immediately. Deactivating an unknown or already-inactive code
/// still succeeds.
///
/// # Errors
///
/// Returns 400 Bad Request when `code` is missing, 500 on storage failure.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<DeleteLinkRequest>,
) -> Result<Json<DeleteLinkResponse>, AppError> {
    let code = payload
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing code", json!({ "field": "code" })))?;

    let deactivated = state.link_service.deactivate(&code).await?;
    if !deactivated {
        tracing::debug!(%code, "deactivate request for a code with no live row");
    }

    Ok(Json(DeleteLinkResponse { success: true }))
}
