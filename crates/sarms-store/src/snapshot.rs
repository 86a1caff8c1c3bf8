//! JSON snapshot files: a plain array of requests.

use std::fs;
use std::path::Path;

use sarms_core::{SoftwareRequest, StoreError};
use tracing::info;

/// Read every request from a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Vec<SoftwareRequest>, StoreError> {
    if !path.exists() {
        return Err(StoreError::SnapshotNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let requests: Vec<SoftwareRequest> = serde_json::from_slice(&bytes)?;
    Ok(requests)
}

/// Write `requests` to `path`, replacing any existing file.
///
/// Writes to a sibling temp file first and renames it into place so a crash
/// never leaves a truncated snapshot behind.
pub fn save_snapshot(path: &Path, requests: &[SoftwareRequest]) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(requests)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    info!(count = requests.len(), path = %path.display(), "saved request snapshot");
    Ok(())
}
