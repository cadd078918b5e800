use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Load-tier failures. Rule violations are never reported through this type.
#[derive(Error, Debug)]
pub enum BolError {
    #[error("Failed to read trace {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("Failed to read JSON: {0}")]
    ParseError(#[source] serde_json::Error),
    #[error("Failed to render report: {0}")]
    RenderError(#[source] serde_json::Error),
}
