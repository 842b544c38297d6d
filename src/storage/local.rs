//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── posts.json     # Latest snapshot (atomic replace)
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{PostStorage, Snapshot};

const SNAPSHOT_KEY: &str = "posts.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl PostStorage for LocalStorage {
    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_bytes(SNAPSHOT_KEY, &bytes).await?;
        log::info!(
            "Snapshot: {} posts written to {}",
            snapshot.count,
            self.location()
        );
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        match self.read_bytes(SNAPSHOT_KEY).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn location(&self) -> String {
        self.path(SNAPSHOT_KEY).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::models::Post;

    fn sample_posts() -> Vec<Post> {
        vec![Post {
            id: "guid-1".to_string(),
            title: "Routing a Send".to_string(),
            url: "https://example.com/1".to_string(),
            date_iso: "2024-06-01T00:00:00.000Z".to_string(),
            tags: vec!["routing".to_string()],
            summary: "Aux sends explained.".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.load_snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested"));
        let snapshot =
            Snapshot::new("https://example.com/rss", sample_posts(), Utc::now()).unwrap();

        storage.write_snapshot(&snapshot).await.unwrap();
        let loaded = storage.load_snapshot().await.unwrap().unwrap();

        assert_eq!(loaded, snapshot);
        assert!(!dir.path().join("nested/posts.tmp").exists());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_snapshot() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let first = Snapshot::new("feed", sample_posts(), Utc::now()).unwrap();
        storage.write_snapshot(&first).await.unwrap();
        let second = Snapshot::new("feed", Vec::new(), Utc::now()).unwrap();
        storage.write_snapshot(&second).await.unwrap();

        let loaded = storage.load_snapshot().await.unwrap().unwrap();
        assert_eq!(loaded.count, 0);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("posts.json"), "{not json").unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.load_snapshot().await.is_err());
    }
}
