//! Request and response shapes for metadata operations.

use serde::{Deserialize, Serialize};

use metabroker_store::{MetadataKey, ProjectStore};

/// A single key/value pair, the unit of create and delete requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPair {
    pub key: String,
    pub value: String,
}

impl MetadataPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A stored key with all of its values, the unit of every response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMetadata {
    pub key: String,
    pub values: Vec<String>,
}

impl From<&MetadataKey> for StoredMetadata {
    fn from(key: &MetadataKey) -> Self {
        Self {
            key: key.name.clone(),
            values: key.values.clone(),
        }
    }
}

impl StoredMetadata {
    /// Shape a project's full key list into the response contract.
    pub fn list_from(store: &ProjectStore) -> Vec<StoredMetadata> {
        store.keys.iter().map(StoredMetadata::from).collect()
    }
}
