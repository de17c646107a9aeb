use thiserror::Error;

use crate::DocId;

/// Errors returned by the index and its snapshot layer.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("document {0} has already been ingested")]
    DuplicateDocument(DocId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: incompatible version {actual}, expected <= {expected}")]
    IncompatibleSnapshot { expected: u32, actual: u32 },

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
