//! File-per-project storage backend.
//!
//! [`FileStore`] keeps one JSON file per project,
//! `<folder>/metadata-<projectId>.json`, and replaces it wholesale on
//! every mutation. A registry of per-project locks serializes the full
//! load-mutate-save sequence for each project.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreResult};
use crate::model::{ProjectStore, FORMAT_VERSION};
use crate::traits::MetadataStore;

/// How [`FileStore`] treats persisted content it cannot decode.
///
/// The service default is [`Lenient`](DecodeMode::Lenient): a malformed
/// file is treated as empty rather than failing the request, so a corrupt
/// write never wedges a project. [`Strict`](DecodeMode::Strict) surfaces
/// the parse error instead, for callers that would rather fail than drop
/// data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeMode {
    /// Malformed content decodes to an empty store (default policy).
    Lenient,
    /// Malformed content is a [`StoreError::Serialization`] error.
    Strict,
}

/// File-per-project implementation of [`MetadataStore`].
pub struct FileStore {
    folder: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Create a store rooted at `folder`.
    ///
    /// The folder itself is created lazily on first write.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The configured storage folder.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// The on-disk path for a project's metadata file.
    pub fn file_path(&self, project_id: &str) -> PathBuf {
        self.folder.join(format!("metadata-{project_id}.json"))
    }

    /// Load a project's store with the default lenient decode.
    pub fn load(&self, project_id: &str) -> StoreResult<ProjectStore> {
        self.load_with(project_id, DecodeMode::Lenient)
    }

    /// Load a project's store with an explicit [`DecodeMode`].
    ///
    /// A missing file is materialized empty and yields an empty store with
    /// the version tag unset; this is not an error. An empty file also
    /// yields an empty store, in either mode.
    pub fn load_with(&self, project_id: &str, mode: DecodeMode) -> StoreResult<ProjectStore> {
        let lock = self.project_lock(project_id)?;
        let _guard = lock
            .lock()
            .map_err(|e| StoreError::Internal(format!("project lock poisoned: {e}")))?;
        self.read_store(project_id, mode)
    }

    /// Persist a project's store, replacing the file contents.
    ///
    /// The version tag is stamped to [`FORMAT_VERSION`] if unset, so every
    /// persisted file carries it.
    pub fn save(&self, project_id: &str, store: &ProjectStore) -> StoreResult<()> {
        let lock = self.project_lock(project_id)?;
        let _guard = lock
            .lock()
            .map_err(|e| StoreError::Internal(format!("project lock poisoned: {e}")))?;
        let mut store = store.clone();
        self.write_store(project_id, &mut store)
    }

    fn project_lock(&self, project_id: &str) -> StoreResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| StoreError::Internal(format!("lock registry poisoned: {e}")))?;
        Ok(locks.entry(project_id.to_string()).or_default().clone())
    }

    /// Read and decode without taking the project lock. Callers hold it.
    fn read_store(&self, project_id: &str, mode: DecodeMode) -> StoreResult<ProjectStore> {
        let path = self.file_path(project_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&self.folder)?;
                File::create(&path)?;
                tracing::debug!(project_id, "materialized empty metadata file");
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(ProjectStore::default());
        }

        match serde_json::from_str(&content) {
            Ok(store) => Ok(store),
            Err(err) => match mode {
                DecodeMode::Lenient => {
                    tracing::warn!(
                        project_id,
                        %err,
                        "malformed metadata file, treating as empty"
                    );
                    Ok(ProjectStore::default())
                }
                DecodeMode::Strict => Err(err.into()),
            },
        }
    }

    /// Encode and atomically replace without taking the project lock.
    ///
    /// Writes to a temporary file in the storage folder, fsyncs, then
    /// renames over the target, so readers never observe a torn file.
    fn write_store(&self, project_id: &str, store: &mut ProjectStore) -> StoreResult<()> {
        if store.version.is_empty() {
            store.version = FORMAT_VERSION.to_string();
        }
        let json = serde_json::to_string(store)?;

        fs::create_dir_all(&self.folder)?;
        let path = self.file_path(project_id);
        let mut tmp = NamedTempFile::new_in(&self.folder)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        tracing::info!(project_id, path = %path.display(), "saved metadata");
        Ok(())
    }
}

impl MetadataStore for FileStore {
    fn load(&self, project_id: &str) -> StoreResult<ProjectStore> {
        FileStore::load(self, project_id)
    }

    fn update(
        &self,
        project_id: &str,
        mutate: &mut dyn FnMut(&mut ProjectStore) -> StoreResult<()>,
    ) -> StoreResult<ProjectStore> {
        let lock = self.project_lock(project_id)?;
        let _guard = lock
            .lock()
            .map_err(|e| StoreError::Internal(format!("project lock poisoned: {e}")))?;

        let mut store = self.read_store(project_id, DecodeMode::Lenient)?;
        mutate(&mut store)?;
        self.write_store(project_id, &mut store)?;
        Ok(store)
    }

    fn delete_project(&self, project_id: &str) -> StoreResult<()> {
        let lock = self.project_lock(project_id)?;
        let _guard = lock
            .lock()
            .map_err(|e| StoreError::Internal(format!("project lock poisoned: {e}")))?;

        let path = self.file_path(project_id);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(project_id, "deleted project metadata");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(project_id, "project metadata already absent");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(StoreError::PermissionDenied { path })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn load_missing_file_returns_empty_and_materializes_file() {
        let (dir, store) = setup();
        let loaded = store.load("p1").unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.version, "");
        assert!(dir.path().join("metadata-p1.json").exists());
    }

    #[test]
    fn lenient_load_treats_malformed_content_as_empty() {
        let (dir, store) = setup();
        fs::write(dir.path().join("metadata-p1.json"), "{not json").unwrap();
        let loaded = store.load("p1").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn strict_load_surfaces_malformed_content() {
        let (dir, store) = setup();
        fs::write(dir.path().join("metadata-p1.json"), "{not json").unwrap();
        let err = store.load_with("p1", DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn empty_file_is_empty_store_in_both_modes() {
        let (dir, store) = setup();
        fs::write(dir.path().join("metadata-p1.json"), "").unwrap();
        assert!(store.load("p1").unwrap().is_empty());
        assert!(store
            .load_with("p1", DecodeMode::Strict)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn save_writes_canonical_json() {
        let (dir, store) = setup();
        let data = ProjectStore {
            version: FORMAT_VERSION.into(),
            keys: vec![crate::MetadataKey {
                name: "foo".into(),
                values: vec!["bar".into(), "rab".into()],
            }],
        };
        store.save("123456", &data).unwrap();
        let on_disk = fs::read_to_string(dir.path().join("metadata-123456.json")).unwrap();
        assert_eq!(
            on_disk,
            r#"{"version":"v1","keys":[{"name":"foo","values":["bar","rab"]}]}"#
        );
    }

    #[test]
    fn save_stamps_unset_version() {
        let (dir, store) = setup();
        let mut data = ProjectStore::default();
        data.create_or_update("foo", "bar");
        assert_eq!(data.version, "");
        store.save("p1", &data).unwrap();
        let on_disk = fs::read_to_string(dir.path().join("metadata-p1.json")).unwrap();
        assert!(on_disk.starts_with(r#"{"version":"v1""#));
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = setup();
        let mut data = ProjectStore::default();
        data.create_or_update("foo", "bar");
        data.create_or_update("foo", "baz");
        data.create_or_update("env", "prod");
        store.save("p1", &data).unwrap();

        let loaded = store.load("p1").unwrap();
        assert_eq!(loaded.version, FORMAT_VERSION);
        assert_eq!(loaded.keys, data.keys);
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let (dir, store) = setup();
        let mut data = ProjectStore::default();
        data.create_or_update("foo", "bar");
        store.save("p1", &data).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["metadata-p1.json"]);
    }

    #[test]
    fn update_persists_mutation_and_returns_saved_store() {
        let (dir, store) = setup();
        let saved = store
            .update("p1", &mut |s| {
                s.create_or_update("Foo", "Bar");
                Ok(())
            })
            .unwrap();
        assert_eq!(saved.keys[0].name, "foo");
        assert_eq!(saved.version, FORMAT_VERSION);
        assert!(dir
            .path()
            .join("metadata-p1.json")
            .metadata()
            .unwrap()
            .len()
            > 0);
    }

    #[test]
    fn failed_mutation_persists_nothing() {
        let (dir, store) = setup();
        let err = store
            .update("p1", &mut |s| s.delete("missing", "value"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        // Only the empty file materialized by the load.
        let on_disk = fs::read_to_string(dir.path().join("metadata-p1.json")).unwrap();
        assert_eq!(on_disk, "");
    }

    #[test]
    fn delete_project_is_idempotent() {
        let (dir, store) = setup();
        let mut data = ProjectStore::default();
        data.create_or_update("foo", "bar");
        store.save("p1", &data).unwrap();

        store.delete_project("p1").unwrap();
        assert!(!dir.path().join("metadata-p1.json").exists());
        store.delete_project("p1").unwrap();
        assert!(store.load("p1").unwrap().is_empty());
    }

    #[test]
    fn concurrent_updates_to_same_project_both_survive() {
        let (_dir, store) = setup();
        let store = Arc::new(store);

        std::thread::scope(|scope| {
            for key in ["alpha", "beta"] {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    store
                        .update("p1", &mut |s| {
                            s.create_or_update(key, "value");
                            Ok(())
                        })
                        .unwrap();
                });
            }
        });

        let loaded = store.load("p1").unwrap();
        let mut names: Vec<&str> = loaded.keys.iter().map(|k| k.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
