use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blob storage for uploaded photos. Returns a URL the browser can load.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, bytes: &[u8]) -> Result<String, ObjectStoreError>;
}

/// Writes objects under a directory that the router also serves at `/uploads`.
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        let public_base = public_base.into().trim_end_matches('/').to_string();
        Self { root: root.into(), public_base }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        let rel = Path::new(key);
        let clean = !key.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(ObjectStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, content_type: &str, bytes: &[u8]) -> Result<String, ObjectStoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(%key, %content_type, size = bytes.len(), "stored object");
        Ok(format!("{}/uploads/{key}", self.public_base))
    }
}

/// `images/<uuid>.<ext>`, extension taken from the client filename when it is sane.
pub fn image_key(file_name: Option<&str>) -> String {
    let ext = file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string());
    format!("images/{}.{ext}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://lb.example/");
        let url = store.put("images/a.png", "image/png", b"png").await.unwrap();
        assert_eq!(url, "http://lb.example/uploads/images/a.png");
        let written = tokio::fs::read(dir.path().join("images/a.png")).await.unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://x");
        for key in ["../etc/passwd", "/abs", "", "a/../../b"] {
            assert!(matches!(store.put(key, "image/png", b"x").await, Err(ObjectStoreError::InvalidKey(_))));
        }
    }

    #[test]
    fn key_extension() {
        assert!(image_key(Some("Cat.JPG")).ends_with(".jpg"));
        assert!(image_key(Some("noext")).ends_with(".bin"));
        assert!(image_key(Some("x.p/ng")).starts_with("images/"));
        assert!(image_key(None).ends_with(".bin"));
    }
}
