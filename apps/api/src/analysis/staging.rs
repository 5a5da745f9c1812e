//! Upload staging — writes an uploaded resume to the staging directory and
//! owns the resulting file until it is removed.
//!
//! `StagedUpload::remove` is the normal cleanup path. If a `StagedUpload` is
//! dropped without being removed (early return, panic, or the client
//! disconnecting and the handler future being cancelled) `Drop` deletes the
//! file synchronously.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create staging directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write staged upload {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    media_type: String,
    original_name: String,
    removed: bool,
}

impl StagedUpload {
    /// Writes `contents` into `dir` under a unique, time-prefixed name.
    /// The directory is created on demand.
    pub async fn write(
        dir: &Path,
        original_name: &str,
        media_type: &str,
        contents: &Bytes,
    ) -> Result<Self, StagingError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StagingError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;

        let path = dir.join(unique_file_name(original_name));

        // Own the path before writing so a partial write is still cleaned up.
        let staged = Self {
            path,
            media_type: media_type.to_string(),
            original_name: original_name.to_string(),
            removed: false,
        };

        tokio::fs::write(&staged.path, contents)
            .await
            .map_err(|source| StagingError::Write {
                path: staged.path.clone(),
                source,
            })?;

        debug!(
            "Staged upload '{}' ({} bytes) at {}",
            staged.original_name,
            contents.len(),
            staged.path.display()
        );
        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Deletes the staged file. Failures are logged, never returned.
    pub async fn remove(mut self) {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => info!("Deleted processed file: {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => error!("Error deleting file {}: {e}", self.path.display()),
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("Deleted abandoned upload: {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => error!("Error deleting file {}: {e}", self.path.display()),
        }
    }
}

/// `<unix-millis>-<uuid>-<name>`, keeping only the final path component of the
/// client-supplied name and replacing characters unsafe in file names.
fn unique_file_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = if sanitized.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        sanitized
    };

    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        sanitized
    )
}
