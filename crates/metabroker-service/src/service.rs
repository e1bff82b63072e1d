//! The [`MetadataService`] façade.

use std::path::Path;

use metabroker_store::{FileStore, MetadataStore, StoreResult};

use crate::types::{MetadataPair, StoredMetadata};

/// Environment variable naming the migration target project.
///
/// When set at startup, [`MetadataService::init`] migrates any legacy (v0)
/// metadata file into that project. Required only when upgrading a
/// deployment that predates project isolation.
pub const MIGRATION_PROJECT_ENV: &str = "MIGRATION_PROJECT_ID";

/// Façade over a [`MetadataStore`] backend.
///
/// Every mutating operation returns the project's full current key list,
/// derived from exactly the state that was persisted.
pub struct MetadataService<S> {
    store: S,
}

impl<S: MetadataStore> MetadataService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert a key/value pair and return the project's full key list.
    ///
    /// Inserting an already-present pair is a no-op that still returns the
    /// current list.
    pub fn create_or_update(
        &self,
        project_id: &str,
        pair: &MetadataPair,
    ) -> StoreResult<Vec<StoredMetadata>> {
        tracing::info!(project_id, key = %pair.key, "create or update metadata");
        let store = self.store.update(project_id, &mut |s| {
            s.create_or_update(&pair.key, &pair.value);
            Ok(())
        })?;
        Ok(StoredMetadata::list_from(&store))
    }

    /// Return the project's full current key list. Never mutates.
    pub fn get_all(&self, project_id: &str) -> StoreResult<Vec<StoredMetadata>> {
        tracing::debug!(project_id, "getting metadata");
        let store = self.store.load(project_id)?;
        Ok(StoredMetadata::list_from(&store))
    }

    /// Remove one value from a key and return the project's full key list.
    ///
    /// Fails with `NotFound` if the key or value is absent; nothing is
    /// persisted in that case.
    pub fn delete(
        &self,
        project_id: &str,
        pair: &MetadataPair,
    ) -> StoreResult<Vec<StoredMetadata>> {
        tracing::info!(project_id, key = %pair.key, "delete metadata");
        let store = self
            .store
            .update(project_id, &mut |s| s.delete(&pair.key, &pair.value))?;
        Ok(StoredMetadata::list_from(&store))
    }

    /// Remove all metadata for a project. Idempotent.
    pub fn delete_project(&self, project_id: &str) -> StoreResult<()> {
        tracing::info!(project_id, "delete project");
        self.store.delete_project(project_id)
    }
}

impl MetadataService<FileStore> {
    /// Startup hook: run the legacy migration if a target is configured.
    ///
    /// Reads [`MIGRATION_PROJECT_ENV`]; when unset or empty, migration is
    /// skipped. A migration failure is returned to the caller, which is
    /// expected to log it and start the service anyway -- the migration is
    /// best-effort and safe to retry on the next startup.
    pub fn init(&self, legacy_file: &Path) -> StoreResult<()> {
        match std::env::var(MIGRATION_PROJECT_ENV) {
            Ok(project) if !project.is_empty() => {
                tracing::info!(
                    target_project_id = %project,
                    "{MIGRATION_PROJECT_ENV} set, running legacy migration"
                );
                self.migrate_to(legacy_file, &project)
            }
            _ => {
                tracing::info!("{MIGRATION_PROJECT_ENV} not set, migration skipped");
                Ok(())
            }
        }
    }

    /// Migrate a legacy (v0) file into `target_project_id`.
    pub fn migrate_to(&self, legacy_file: &Path, target_project_id: &str) -> StoreResult<()> {
        self.store.migrate_legacy(legacy_file, target_project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metabroker_store::{InMemoryStore, StoreError};
    use std::fs;
    use tempfile::TempDir;

    fn service() -> MetadataService<InMemoryStore> {
        MetadataService::new(InMemoryStore::new())
    }

    #[test]
    fn create_returns_full_key_list() {
        let svc = service();
        svc.create_or_update("p1", &MetadataPair::new("region", "us-west"))
            .unwrap();
        let list = svc
            .create_or_update("p1", &MetadataPair::new("env", "prod"))
            .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].key, "region");
        assert_eq!(list[1].key, "env");
    }

    #[test]
    fn create_is_idempotent_across_case_variants() {
        let svc = service();
        svc.create_or_update("p1", &MetadataPair::new("Foo", "Bar"))
            .unwrap();
        let list = svc
            .create_or_update("p1", &MetadataPair::new("foo", "bar"))
            .unwrap();
        assert_eq!(list, vec![StoredMetadata {
            key: "foo".into(),
            values: vec!["bar".into()],
        }]);
    }

    #[test]
    fn get_all_never_mutates() {
        let svc = service();
        assert!(svc.get_all("p1").unwrap().is_empty());
        svc.create_or_update("p1", &MetadataPair::new("k", "v"))
            .unwrap();
        let first = svc.get_all("p1").unwrap();
        let second = svc.get_all("p1").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn delete_of_absent_pair_is_not_found() {
        let svc = service();
        svc.create_or_update("p1", &MetadataPair::new("foo", "bar"))
            .unwrap();
        let err = svc
            .delete("p1", &MetadataPair::new("foo", "absent"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        // Store unchanged.
        assert_eq!(svc.get_all("p1").unwrap()[0].values, vec!["bar"]);
    }

    #[test]
    fn deleting_last_value_keeps_the_key_in_the_response() {
        let svc = service();
        svc.create_or_update("p1", &MetadataPair::new("foo", "bar"))
            .unwrap();
        let list = svc.delete("p1", &MetadataPair::new("foo", "bar")).unwrap();
        assert_eq!(list, vec![StoredMetadata {
            key: "foo".into(),
            values: vec![],
        }]);
    }

    #[test]
    fn delete_project_then_get_all_is_empty() {
        let dir = TempDir::new().unwrap();
        let svc = MetadataService::new(FileStore::new(dir.path()));
        svc.create_or_update("p1", &MetadataPair::new("foo", "bar"))
            .unwrap();
        svc.delete_project("p1").unwrap();
        assert!(svc.get_all("p1").unwrap().is_empty());
        // And again: deleting a nonexistent project succeeds.
        svc.delete_project("p1").unwrap();
    }

    #[test]
    fn init_without_trigger_skips_migration() {
        let dir = TempDir::new().unwrap();
        let svc = MetadataService::new(FileStore::new(dir.path()));
        let legacy = dir.path().join("metadata.json");
        fs::write(&legacy, r#"{"keys":[]}"#).unwrap();

        svc.init(&legacy).unwrap();
        // Not configured: the legacy file must be left alone.
        assert!(legacy.exists());
    }

    #[test]
    fn migrate_to_runs_the_store_migration() {
        let dir = TempDir::new().unwrap();
        let svc = MetadataService::new(FileStore::new(dir.path()));
        let legacy = dir.path().join("metadata.json");
        fs::write(&legacy, r#"{"keys":[{"name":"foo","values":["bar","baz"]}]}"#).unwrap();

        svc.migrate_to(&legacy, "p1").unwrap();

        assert!(!legacy.exists());
        let list = svc.get_all("p1").unwrap();
        assert_eq!(list[0].key, "foo");
        assert_eq!(list[0].values, vec!["bar", "baz"]);
    }
}
