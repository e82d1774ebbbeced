//! Resume upload storage.
//!
//! Streams one multipart file field to the configured directory under a
//! generated name, enforcing the size ceiling while the bytes arrive so an
//! oversized upload never reaches the handler's email logic.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Largest accepted resume, in bytes (2 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("malformed multipart body: {0}")]
    Malformed(String),

    #[error("unexpected file field '{0}'")]
    UnexpectedFile(String),

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge {
                limit: MAX_UPLOAD_BYTES,
            }
        } else {
            UploadError::Malformed(err.body_text())
        }
    }
}

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Filename as sent by the client.
    pub original_name: String,
    pub stored_path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: u64,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Streams `field` to disk. On any failure the partial file is removed.
    pub async fn store(&self, mut field: Field<'_>) -> Result<StoredUpload, UploadError> {
        let original_name = field.file_name().unwrap_or_default().to_string();
        let stored_path = self.dir.join(Uuid::new_v4().simple().to_string());

        let mut file = File::create(&stored_path).await?;
        match self.copy_field(&mut field, &mut file).await {
            Ok(size_bytes) => {
                debug!(
                    original_name = %original_name,
                    path = %stored_path.display(),
                    size_bytes,
                    "Stored upload"
                );
                Ok(StoredUpload {
                    original_name,
                    stored_path,
                    size_bytes,
                })
            }
            Err(e) => {
                drop(file);
                remove_quietly(&stored_path).await;
                Err(e)
            }
        }
    }

    async fn copy_field(&self, field: &mut Field<'_>, file: &mut File) -> Result<u64, UploadError> {
        let mut written: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            written += chunk.len() as u64;
            if written > self.max_bytes {
                return Err(UploadError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(written)
    }

    /// Removes a stored upload. Failures are logged, never returned.
    pub async fn discard(&self, upload: &StoredUpload) {
        remove_quietly(&upload.stored_path).await;
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), "Failed to remove upload: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_dir_creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().join("a/b/uploads"), MAX_UPLOAD_BYTES);

        store.ensure_dir().await.unwrap();

        assert!(store.dir().is_dir());
    }

    #[tokio::test]
    async fn test_discard_removes_file_and_tolerates_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path(), MAX_UPLOAD_BYTES);
        let path = tmp.path().join("resume");
        tokio::fs::write(&path, b"cv").await.unwrap();
        let upload = StoredUpload {
            original_name: "cv.pdf".into(),
            stored_path: path.clone(),
            size_bytes: 2,
        };

        store.discard(&upload).await;
        assert!(!path.exists());

        // second removal only logs
        store.discard(&upload).await;
    }

    #[test]
    fn test_ceiling_is_two_mebibytes() {
        assert_eq!(MAX_UPLOAD_BYTES, 2_097_152);
    }
}
