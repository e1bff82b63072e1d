//! The [`MetadataStore`] trait defining the storage interface.
//!
//! Any backend (file-per-project, in-memory) implements this trait to
//! provide durable CRUD over per-project metadata for the service façade.

use crate::error::StoreResult;
use crate::model::ProjectStore;

/// Storage backend for per-project metadata.
///
/// Implementations must be thread-safe (`Send + Sync`) and must run the
/// whole load-mutate-save sequence of [`update`](Self::update) as one
/// critical section per project: two concurrent updates to the same
/// project may interleave with updates to *other* projects, but never
/// with each other. A narrower lock (mutate only) loses writes when two
/// callers race on the same file.
pub trait MetadataStore: Send + Sync {
    /// Load the current store for a project.
    ///
    /// A project that has never been written yields an empty store; this
    /// is not an error.
    fn load(&self, project_id: &str) -> StoreResult<ProjectStore>;

    /// Run `mutate` against the project's store and persist the result.
    ///
    /// The load, the mutation, and the save happen under the project's
    /// write lock. If `mutate` returns an error, nothing is persisted and
    /// the error is passed through unchanged. On success the persisted
    /// store is returned so callers can derive the response from exactly
    /// what was written.
    fn update(
        &self,
        project_id: &str,
        mutate: &mut dyn FnMut(&mut ProjectStore) -> StoreResult<()>,
    ) -> StoreResult<ProjectStore>;

    /// Remove all metadata for a project.
    ///
    /// Deleting a project that does not exist is a success (idempotent).
    fn delete_project(&self, project_id: &str) -> StoreResult<()>;
}
