//! Sink delivery — writes a snapshot to the pointer file.
//!
//! The file is replaced as a whole through [`atomic_write`]. Missing
//! directories are not created. Callers treat every error here as
//! best-effort and only report it.

use std::path::{Path, PathBuf};

use crate::atomic::atomic_write;
use crate::capture::FocusSnapshot;

/// Pointer file write failure.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write pointer file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Compact JSON encoding of a snapshot.
///
/// Deterministic: the same snapshot always yields the same bytes.
pub fn encode(snapshot: &FocusSnapshot) -> Result<Vec<u8>, WriteError> {
    Ok(serde_json::to_vec(snapshot)?)
}

/// Replace the content of `target` with the encoded snapshot.
pub fn write_pointer(snapshot: &FocusSnapshot, target: &Path) -> Result<(), WriteError> {
    let content = encode(snapshot)?;
    atomic_write(target, &content).map_err(|source| WriteError::Io {
        path: target.to_path_buf(),
        source,
    })
}
