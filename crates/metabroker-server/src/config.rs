use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Runtime configuration for the metadata broker server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Folder holding the per-project metadata files.
    pub data_folder: PathBuf,
    /// Legacy (pre-project) metadata file, migrated at startup when a
    /// migration target project is configured via the environment.
    pub legacy_file: PathBuf,
    /// Origins allowed by the CORS layer. Empty disables CORS handling.
    pub allowed_cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9988".parse().unwrap(),
            data_folder: PathBuf::from("/data"),
            legacy_file: PathBuf::from("/data/metadata.json"),
            allowed_cors_origins: Vec::new(),
        }
    }
}
