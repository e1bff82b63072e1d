//! Project lifecycle adapter.
//!
//! The broker does not own tenancy: an external notifier announces project
//! creation and deletion. This module is that notifier's contract -- a
//! channel of [`LifecycleEvent`]s consumed by [`watch_projects`]. Deletion
//! removes the project's metadata; creation needs no action because a
//! project's file materializes lazily on its first write.

use std::sync::Arc;

use tokio::sync::mpsc;

use metabroker_service::MetadataService;
use metabroker_store::MetadataStore;

/// A project lifecycle change announced by the external notifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created { project_id: String },
    Deleted { project_id: String },
}

/// Consume lifecycle events until the channel closes.
///
/// A failed deletion is logged and the watcher keeps running; the notifier
/// is expected to re-announce deletions it considers unacknowledged.
pub async fn watch_projects<S: MetadataStore + 'static>(
    service: Arc<MetadataService<S>>,
    mut events: mpsc::Receiver<LifecycleEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            LifecycleEvent::Created { project_id } => {
                tracing::debug!(%project_id, "project created, nothing to materialize");
            }
            LifecycleEvent::Deleted { project_id } => {
                tracing::info!(%project_id, "project deleted, removing metadata");
                if let Err(err) = service.delete_project(&project_id) {
                    tracing::error!(%project_id, %err, "failed to remove project metadata");
                }
            }
        }
    }
    tracing::debug!("lifecycle channel closed, watcher exiting");
}
