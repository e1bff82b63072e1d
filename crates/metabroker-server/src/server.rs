use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use metabroker_service::MetadataService;
use metabroker_store::FileStore;

use crate::auth::{AllowAll, PolicyClient};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::lifecycle::{watch_projects, LifecycleEvent};
use crate::router::build_router;
use crate::state::AppState;

/// The metadata broker server.
///
/// Wires the file store, service façade, policy client, and optional
/// lifecycle feed into one HTTP server.
pub struct MetadataServer {
    config: ServerConfig,
    policy: Arc<dyn PolicyClient>,
    lifecycle: Option<mpsc::Receiver<LifecycleEvent>>,
}

impl MetadataServer {
    /// Create a server with the permissive default policy.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            policy: Arc::new(AllowAll),
            lifecycle: None,
        }
    }

    /// Replace the policy client.
    pub fn with_policy(mut self, policy: Arc<dyn PolicyClient>) -> Self {
        self.policy = policy;
        self
    }

    /// Attach a project lifecycle feed, consumed for as long as the
    /// notifier keeps the sender alive.
    pub fn with_lifecycle(mut self, events: mpsc::Receiver<LifecycleEvent>) -> Self {
        self.lifecycle = Some(events);
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let service = Arc::new(MetadataService::new(FileStore::new(
            self.config.data_folder.clone(),
        )));
        build_router(
            AppState::new(service, Arc::clone(&self.policy)),
            &self.config.allowed_cors_origins,
        )
    }

    /// Run the startup migration and serve requests.
    ///
    /// A migration failure is logged and startup continues: the migration
    /// is best-effort and safe to retry on the next boot.
    pub async fn serve(mut self) -> ServerResult<()> {
        let service = Arc::new(MetadataService::new(FileStore::new(
            self.config.data_folder.clone(),
        )));

        if let Err(err) = service.init(&self.config.legacy_file) {
            tracing::warn!(%err, "legacy migration failed, continuing startup");
        }

        if let Some(events) = self.lifecycle.take() {
            tokio::spawn(watch_projects(Arc::clone(&service), events));
        }

        let app = build_router(
            AppState::new(service, Arc::clone(&self.policy)),
            &self.config.allowed_cors_origins,
        );
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("metadata broker listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
