//! One-shot migration from the legacy (v0) metadata format.
//!
//! The v0 format predates project isolation: a single global file holding
//! `{"keys":[...]}` with no version tag. Migration wraps that content as a
//! v1 [`ProjectStore`] filed under an externally supplied target project,
//! then removes the legacy file. It runs at most once per deployment, at
//! startup, and only when a migration target is configured.
//!
//! The two phases (write v1, remove v0) make the operation resumable: a
//! crash after the write is detected on the next attempt by the populated
//! v1 target, and only the removal is retried.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::StoreResult;
use crate::file::FileStore;
use crate::model::ProjectStore;

/// Decode a legacy (v0) metadata file.
///
/// Unlike the per-project v1 load, this is strict: the legacy file is the
/// only copy of pre-migration data, so a decode failure must surface
/// rather than silently migrating an empty store.
pub fn load_legacy(path: &Path) -> StoreResult<ProjectStore> {
    let content = fs::read_to_string(path)?;
    let store: ProjectStore = serde_json::from_str(&content)?;
    Ok(store)
}

impl FileStore {
    /// Migrate a legacy (v0) file into this store under `target_project_id`.
    ///
    /// No-op if `legacy_file` does not exist. If the v1 target file already
    /// holds data, the write phase is skipped -- a previous attempt got that
    /// far -- and only the legacy-file removal is retried, so an interrupted
    /// migration resumes cleanly instead of failing.
    pub fn migrate_legacy(&self, legacy_file: &Path, target_project_id: &str) -> StoreResult<()> {
        if !legacy_file.exists() {
            tracing::info!(
                legacy = %legacy_file.display(),
                "no legacy metadata file, nothing to migrate"
            );
            return Ok(());
        }

        tracing::info!(
            legacy = %legacy_file.display(),
            target_project_id,
            "migrating metadata from v0 to v1"
        );

        let target = self.file_path(target_project_id);
        let target_populated = fs::metadata(&target).map(|m| m.len() > 0).unwrap_or(false);
        if target_populated {
            tracing::warn!(
                path = %target.display(),
                "v1 target already holds data, resuming interrupted migration"
            );
        } else {
            let migrated = load_legacy(legacy_file)?;
            self.save(target_project_id, &migrated)?;
        }

        tracing::info!(legacy = %legacy_file.display(), "removing legacy metadata file");
        match fs::remove_file(legacy_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
