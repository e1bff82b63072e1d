use std::sync::Arc;

use metabroker_service::MetadataService;
use metabroker_store::FileStore;

use crate::auth::PolicyClient;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MetadataService<FileStore>>,
    pub policy: Arc<dyn PolicyClient>,
}

impl AppState {
    pub fn new(service: Arc<MetadataService<FileStore>>, policy: Arc<dyn PolicyClient>) -> Self {
        Self { service, policy }
    }
}
