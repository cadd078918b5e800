//! Document loader: reads one trace file into a JSON tree.

use crate::core::error::BolError;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed trace plus the digest of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedTrace {
    pub path: PathBuf,
    pub document: Value,
    pub sha256: String,
}

pub fn load_trace(path: &Path) -> Result<LoadedTrace, BolError> {
    let bytes = fs::read(path).map_err(|source| BolError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_trace(&bytes)?;
    Ok(LoadedTrace {
        path: path.to_path_buf(),
        document,
        sha256: sha256_hex(&bytes),
    })
}

pub fn parse_trace(bytes: &[u8]) -> Result<Value, BolError> {
    serde_json::from_slice(bytes).map_err(BolError::ParseError)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
