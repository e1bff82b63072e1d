//! In-memory metadata store for testing and ephemeral use.
//!
//! [`InMemoryStore`] keeps every project's [`ProjectStore`] in a `HashMap`
//! behind a `RwLock`. It implements the full [`MetadataStore`] trait and
//! is suitable for unit tests and short-lived embedding. Data is lost when
//! the store is dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::model::{ProjectStore, FORMAT_VERSION};
use crate::traits::MetadataStore;

/// An in-memory implementation of [`MetadataStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    projects: RwLock<HashMap<String, ProjectStore>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for InMemoryStore {
    fn load(&self, project_id: &str) -> StoreResult<ProjectStore> {
        let projects = self
            .projects
            .read()
            .map_err(|e| StoreError::Internal(format!("lock poisoned: {e}")))?;
        Ok(projects.get(project_id).cloned().unwrap_or_default())
    }

    fn update(
        &self,
        project_id: &str,
        mutate: &mut dyn FnMut(&mut ProjectStore) -> StoreResult<()>,
    ) -> StoreResult<ProjectStore> {
        let mut projects = self
            .projects
            .write()
            .map_err(|e| StoreError::Internal(format!("lock poisoned: {e}")))?;

        // Mutate a copy so a failed mutation leaves the stored state
        // untouched, matching the persistence semantics of the file
        // backend.
        let mut store = projects.get(project_id).cloned().unwrap_or_default();
        mutate(&mut store)?;
        if store.version.is_empty() {
            store.version = FORMAT_VERSION.to_string();
        }
        projects.insert(project_id.to_string(), store.clone());
        Ok(store)
    }

    fn delete_project(&self, project_id: &str) -> StoreResult<()> {
        let mut projects = self
            .projects
            .write()
            .map_err(|e| StoreError::Internal(format!("lock poisoned: {e}")))?;
        projects.remove(project_id);
        Ok(())
    }
}
