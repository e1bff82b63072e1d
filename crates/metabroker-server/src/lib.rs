//! HTTP surface and boundary adapters for the Metabroker.
//!
//! Hosts the metadata service over HTTP/JSON with a policy-decision seam
//! and a project lifecycle feed. All storage semantics live in
//! `metabroker-store`; all response shaping lives in `metabroker-service`;
//! this crate only routes, authorizes, and maps errors to status codes.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AllowAll, PolicyClient};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use lifecycle::{watch_projects, LifecycleEvent};
pub use server::MetadataServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metabroker_service::MetadataService;
    use metabroker_store::FileStore;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn health_endpoint() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = Arc::new(MetadataService::new(FileStore::new(dir.path())));
        let app = router::build_router(AppState::new(service, Arc::new(AllowAll)), &[]);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }
}
