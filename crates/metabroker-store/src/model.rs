//! Core data types for project metadata and their mutation rules.
//!
//! A project's metadata is a flat list of named keys, each holding an
//! ordered list of distinct string values. Key names and values are
//! lowercased before storage so lookups are case-insensitive.

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// The current on-disk format version tag.
pub const FORMAT_VERSION: &str = "v1";

/// A named key holding an ordered list of distinct values.
///
/// Field order matters: the canonical JSON shape emits `name` before
/// `values`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataKey {
    /// Lowercased key name, unique within a [`ProjectStore`].
    pub name: String,
    /// Lowercased values in insertion order, no duplicates.
    pub values: Vec<String>,
}

/// The complete metadata for one project.
///
/// Serializes to the canonical v1 shape:
/// `{"version":"v1","keys":[{"name":...,"values":[...]},...]}`.
///
/// A freshly materialized store (no file on disk yet) has an unset version
/// tag; [`FileStore::save`](crate::FileStore::save) stamps it on the way
/// out. The legacy v0 shape (`{"keys":[...]}`, no version field) decodes
/// into the same type via the `version` default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStore {
    /// Format version tag, [`FORMAT_VERSION`] for current files.
    #[serde(default)]
    pub version: String,
    /// The project's keys, in first-insertion order.
    #[serde(default)]
    pub keys: Vec<MetadataKey>,
}

impl ProjectStore {
    /// Insert a value under a key, creating the key if needed.
    ///
    /// Both `key` and `value` are lowercased first. Inserting a pair that
    /// is already present is a silent no-op, so the operation is
    /// idempotent. Value order within a key is insertion order.
    pub fn create_or_update(&mut self, key: &str, value: &str) {
        let key = key.to_lowercase();
        let value = value.to_lowercase();

        if let Some(entry) = self.keys.iter_mut().find(|k| k.name == key) {
            if entry.values.iter().any(|v| *v == value) {
                return;
            }
            tracing::debug!(%key, %value, "appending value to existing key");
            entry.values.push(value);
            return;
        }

        tracing::debug!(%key, %value, "adding new key");
        self.keys.push(MetadataKey {
            name: key,
            values: vec![value],
        });
    }

    /// Remove one value from a key.
    ///
    /// Both `key` and `value` are lowercased first. The relative order of
    /// the remaining values is preserved. Removing the last value leaves
    /// the key present with an empty value list; the key itself is never
    /// removed here.
    ///
    /// Returns [`StoreError::NotFound`] if the key does not exist or the
    /// value is not present under it.
    pub fn delete(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let key = key.to_lowercase();
        let value = value.to_lowercase();

        if let Some(entry) = self.keys.iter_mut().find(|k| k.name == key) {
            if let Some(pos) = entry.values.iter().position(|v| *v == value) {
                entry.values.remove(pos);
                return Ok(());
            }
        }
        Err(StoreError::NotFound { key, value })
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
