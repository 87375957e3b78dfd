use std::path::{Path, PathBuf};

use crate::catalog::model::VehicleOption;
use crate::foundation::error::{GnxError, GnxResult};

/// Filename used when no catalog vehicle backs the current selection.
pub const FALLBACK_FILENAME: &str = "GNX-cover-art.jpg";

/// `GNX-{description}-{artist}.jpg`, or [`FALLBACK_FILENAME`] without a resolved vehicle.
///
/// Path separators are replaced so the name stays a single path component.
pub fn download_filename(vehicle: Option<&VehicleOption>, artist: &str) -> String {
    match vehicle {
        Some(v) => format!("GNX-{}-{}.jpg", v.description, artist).replace(['/', '\\'], "-"),
        None => FALLBACK_FILENAME.to_string(),
    }
}

/// Write an export into `dir` under `filename`, creating `dir` when missing.
pub async fn save_download(dir: &Path, filename: &str, jpeg: &[u8]) -> GnxResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| GnxError::Other(anyhow::anyhow!("create output dir '{}': {e}", dir.display())))?;
    let path = dir.join(filename);
    tokio::fs::write(&path, jpeg)
        .await
        .map_err(|e| GnxError::Other(anyhow::anyhow!("write '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), bytes = jpeg.len(), "saved download");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/export/download.rs"]
mod tests;
