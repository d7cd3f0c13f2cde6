//! Local-disk media storage for uploaded videos.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::store::{MediaStore, StoreResult};

/// Stores media files flat under a root directory.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `filename` under the root, rejecting anything that could
    /// escape it.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, CoreError> {
        validate_filename(filename)?;
        Ok(self.root.join(filename))
    }
}

/// Stored filenames are a single path component without traversal.
pub fn validate_filename(filename: &str) -> Result<(), CoreError> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0'])
    {
        return Err(CoreError::Validation(format!(
            "Invalid media filename '{filename}'"
        )));
    }
    Ok(())
}

impl MediaStore for LocalMediaStore {
    async fn store_file(&self, bytes: &[u8], extension: &str) -> StoreResult<String> {
        let filename = format!("{}.{}", uuid::Uuid::new_v4(), extension);
        let path = self.path_for(&filename)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(%filename, size = bytes.len(), "Stored media file");
        Ok(filename)
    }

    async fn delete_file(&self, filename: &str) -> StoreResult<bool> {
        let path = self.path_for(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::Storage(format!(
                "Failed to delete {}: {e}",
                path.display()
            ))),
        }
    }

    async fn file_exists(&self, filename: &str) -> StoreResult<bool> {
        let path = self.path_for(filename)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let media = LocalMediaStore::new(dir.path().join("videos"));

        let name = media.store_file(b"frames", "mp4").await.unwrap();
        assert!(name.ends_with(".mp4"));
        assert!(media.file_exists(&name).await.unwrap());
        assert_eq!(std::fs::read(media.path_for(&name).unwrap()).unwrap(), b"frames");

        assert!(media.delete_file(&name).await.unwrap());
        assert!(!media.file_exists(&name).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_missing_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let media = LocalMediaStore::new(dir.path());
        assert!(!media.delete_file("gone.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let media = LocalMediaStore::new(dir.path());
        assert!(media.delete_file("../etc/passwd").await.is_err());
        assert!(media.file_exists("a/b.mp4").await.is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("ok.mp4").is_ok());
    }
}
