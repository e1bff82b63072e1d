//! Service façade for the Metabroker.
//!
//! [`MetadataService`] is the single entry point for all metadata
//! operations, regardless of the transport in front of it. It resolves a
//! project identifier to store operations and shapes the result into the
//! response contract: every successful mutation returns the project's
//! full current key list.
//!
//! The façade holds no business logic of its own beyond response shaping.
//! Mutation rules live in the store's data model; persistence and locking
//! live in the store backend. Store errors propagate unchanged so the
//! transport layer can map them to protocol status codes.
//!
//! Generic over [`MetadataStore`](metabroker_store::MetadataStore):
//! production wires a [`FileStore`](metabroker_store::FileStore), tests an
//! [`InMemoryStore`](metabroker_store::InMemoryStore).

pub mod service;
pub mod types;

pub use service::{MetadataService, MIGRATION_PROJECT_ENV};
pub use types::{MetadataPair, StoredMetadata};
