/// Error types shared by the launch and persistence paths
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the native host runtime
#[derive(Debug, Error)]
pub enum HostError {
    #[error("startup service query failed: {0}")]
    StartupQuery(String),
    #[error("failed to create window: {0}")]
    Window(String),
    #[error("failed to create web view: {0}")]
    WebView(String),
}

/// Failures while requesting a new instance
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to resolve current executable: {0}")]
    Executable(#[source] std::io::Error),
    #[error("failed to spawn instance for '{service_id}': {source}")]
    Spawn {
        service_id: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the geometry store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to determine user config directory")]
    NoConfigDir,
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid geometry file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
