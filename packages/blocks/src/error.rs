//! Error types for the block model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate block definition: {0}")]
    DuplicateDefinition(String),
}
