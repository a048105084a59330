//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/api/*`       - JSON API: create, list, deactivate (permissive CORS)
//! - `GET /health`  - Health check (storage probe)
//! - anything else  - Short-code resolution (redirect / interstitial / 404)
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **No-store headers** - every dynamic response disables caching so
//!   intermediaries never serve a stale redirect
//! - **Path normalization** - trailing slash handling

use axum::http::{HeaderValue, header};
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api;
use crate::api::handlers::{health_handler, resolve_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
///
/// Resolution is the router fallback rather than a fixed `/{code}` route:
/// the code extractor owns path interpretation, so every recognized route
/// prefix (and the last-segment fallback) works without enumerating routes
/// here.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .fallback(resolve_handler)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        ))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
