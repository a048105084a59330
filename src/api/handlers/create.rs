//! Handler for the link creation endpoint.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::create::{CreateLinkRequest, CreateLinkResponse};
use crate::domain::client_context::ClientContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::origin_from_headers;

/// Registers submitted content and returns the public short URL.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "content": "example.com",
///   "expires_in_minutes": 60,
///   "route_hint": "share",          // optional
///   "restrictive_context": false     // optional
/// }
/// ```
///
/// # Response
///
/// URL content yields the registered entry (code, display name, expiry,
/// public URL); text content is echoed back with `is_url: false` and no
/// entry is created.
///
/// # Errors
///
/// Returns 400 Bad Request on validation failure (empty content, missing or
/// non-positive expiry for URL content, missing Host header) and 500 on
/// allocation exhaustion or storage failure.
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<CreateLinkResponse>, AppError> {
    payload.validate()?;

    let content = payload
        .content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing content", json!({ "field": "content" })))?;

    let origin = origin_from_headers(&headers)?;

    let ctx = ClientContext {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string()),
        source_address: None,
        restrictive_flag: payload.restrictive_context,
    };

    let outcome = state
        .link_service
        .create(
            &content,
            payload.expires_in_minutes,
            payload.route_hint,
            &ctx,
            &origin,
        )
        .await?;

    Ok(Json(outcome.into()))
}
