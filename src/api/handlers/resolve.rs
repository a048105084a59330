//! Handler for short-code resolution.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{ConnectInfo, OriginalUri, Query, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::application::services::Resolution;
use crate::domain::client_context::ClientContext;
use crate::state::AppState;
use crate::utils::request_origin::source_address;

/// Interstitial page shown to restrictive in-app browsers: manual open plus
/// copy-to-clipboard, no automatic redirect.
#[derive(Template, WebTemplate)]
#[template(path = "interstitial.html")]
struct InterstitialTemplate {
    destination: String,
}

/// Raw text render for text-kind entries.
#[derive(Template, WebTemplate)]
#[template(path = "text_view.html")]
struct TextViewTemplate {
    content: String,
}

/// Page answering unknown, expired, and deactivated codes alike.
#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Explicit restrictive-context claim (`1` or `true`).
    inapp: Option<String>,
}

/// Resolves any unmatched path to a redirect or page.
///
/// # Endpoint
///
/// Router fallback, GET. The short code is extracted from the path itself
/// (route-prefix patterns, then last segment), so `/go/{code}`,
/// `/share/{code}`, a bare `/{code}`, and unknown prefixes all work. Query
/// strings never affect extraction.
///
/// # Responses
///
/// - 302 with `Location` for a live URL entry in an ordinary browser
/// - 200 interstitial HTML in a restrictive in-app browser
/// - 200 text page for a text-kind entry
/// - 404 HTML page otherwise, identical for unknown and expired codes
pub async fn resolve_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ResolveQuery>,
    method: Method,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return not_found_page();
    }

    let ctx = ClientContext {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string()),
        source_address: source_address(&headers, Some(addr)),
        restrictive_flag: query
            .inapp
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true")),
    };

    match state.redirect_service.resolve(uri.path(), &ctx).await {
        Ok(Resolution::Redirect { location }) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Ok(Resolution::Interstitial { destination }) => {
            InterstitialTemplate { destination }.into_response()
        }
        Ok(Resolution::Text { content }) => TextViewTemplate { content }.into_response(),
        Ok(Resolution::NotFound) => not_found_page(),
        Err(e) => {
            // Lookup failures answer exactly like a missing code.
            tracing::error!(path = uri.path(), error = %e, "resolution failed");
            not_found_page()
        }
    }
}

fn not_found_page() -> Response {
    match NotFoundTemplate.render() {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render not-found template");
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
