use axum::http::HeaderValue;
use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all metadata endpoints.
pub fn build_router(state: AppState, allowed_cors_origins: &[String]) -> Router {
    Router::new()
        .route("/healthz", get(handler::health_handler))
        .route(
            "/v1/metadata",
            get(handler::get_metadata)
                .post(handler::create_or_update_metadata)
                .delete(handler::delete_metadata),
        )
        .route("/v1/projects/:project_id", delete(handler::delete_project))
        .layer(cors_layer(allowed_cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new().allow_origin(origins)
}
