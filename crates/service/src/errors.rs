use std::path::PathBuf;
use thiserror::Error;

use crate::serializer::SerializerError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("malformed document {}: {source}", .path.display())]
    Parse { path: PathBuf, #[source] source: serde_json::Error },
    #[error("cannot encode document for {}: {source}", .path.display())]
    Encode { path: PathBuf, #[source] source: serde_json::Error },
    #[error("serializer error: {0}")]
    Serializer(#[from] SerializerError),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse { path: path.into(), source }
    }

    /// Well-formed JSON whose shape the store cannot use.
    pub fn malformed(path: impl Into<PathBuf>, what: &str) -> Self {
        Self::parse(path, <serde_json::Error as serde::de::Error>::custom(what))
    }
}
