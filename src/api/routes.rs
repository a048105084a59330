//! JSON API router.

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{create_link_handler, delete_link_handler, list_links_handler};
use crate::state::AppState;

/// Routes under `/api`.
///
/// Every route carries a permissive CORS layer: browsers may call these
/// endpoints from any origin, and preflight requests get an empty 200.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/links",
            post(create_link_handler)
                .get(list_links_handler)
                .delete(delete_link_handler),
        )
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
