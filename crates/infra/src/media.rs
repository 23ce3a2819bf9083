//! Uploaded media persistence (avatars, resumes, svgs, banners).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use folio_core::MediaAsset;

/// Route prefix under which stored media is served.
pub const PUBLIC_PREFIX: &str = "uploads";

const MAX_EXTENSION_CHARS: usize = 8;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid media id: {0}")]
    InvalidId(String),

    #[error("media io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level folder a kind of upload is filed under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MediaFolder {
    Avatars,
    Resumes,
    Skills,
    SoftwareApplications,
    Projects,
}

impl MediaFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFolder::Avatars => "avatars",
            MediaFolder::Resumes => "resumes",
            MediaFolder::Skills => "skills",
            MediaFolder::SoftwareApplications => "software-applications",
            MediaFolder::Projects => "projects",
        }
    }
}

/// A file received from a client, fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Lowercased alphanumeric extension of the client file name, if usable.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let ext = Path::new(name).extension()?.to_str()?;
        let valid = !ext.is_empty()
            && ext.len() <= MAX_EXTENSION_CHARS
            && ext.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| ext.to_ascii_lowercase())
    }
}

/// Generates `<folder>/<uuid>[.<ext>]`; clients never choose storage paths.
fn new_public_id(folder: MediaFolder, upload: &Upload) -> String {
    match upload.extension() {
        Some(ext) => format!("{}/{}.{ext}", folder.as_str(), Uuid::now_v7()),
        None => format!("{}/{}", folder.as_str(), Uuid::now_v7()),
    }
}

/// Accepts exactly `<folder>/<file>` with no traversal.
fn check_public_id(public_id: &str) -> Result<(), MediaError> {
    let mut parts = public_id.split('/');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(folder), Some(file), None) => {
            let plain = |s: &str| {
                !s.is_empty()
                    && !s.starts_with('.')
                    && s.chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            };
            plain(folder) && plain(file)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MediaError::InvalidId(public_id.to_string()))
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn save(&self, folder: MediaFolder, upload: Upload) -> Result<MediaAsset, MediaError>;

    /// Removing media that is already gone is not an error.
    async fn delete(&self, asset: &MediaAsset) -> Result<(), MediaError>;
}

/// Stores files below a root directory served at `<public_base_url>/uploads/`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, public_id: &str) -> String {
        format!("{}/{PUBLIC_PREFIX}/{public_id}", self.public_base_url)
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, folder: MediaFolder, upload: Upload) -> Result<MediaAsset, MediaError> {
        let public_id = new_public_id(folder, &upload);
        let path = self.root.join(&public_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::debug!(public_id = %public_id, bytes = upload.bytes.len(), "media stored");
        let url = self.url_for(&public_id);
        Ok(MediaAsset::new(public_id, url))
    }

    async fn delete(&self, asset: &MediaAsset) -> Result<(), MediaError> {
        check_public_id(&asset.public_id)?;
        match tokio::fs::remove_file(self.root.join(&asset.public_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(public_id = %asset.public_id, "media already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps uploads in memory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(public_id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> MediaError {
    MediaError::Io(std::io::Error::other("media store lock poisoned"))
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn save(&self, folder: MediaFolder, upload: Upload) -> Result<MediaAsset, MediaError> {
        let public_id = new_public_id(folder, &upload);
        self.files
            .lock()
            .map_err(poisoned)?
            .insert(public_id.clone(), upload.bytes);
        let url = format!("memory://{PUBLIC_PREFIX}/{public_id}");
        Ok(MediaAsset::new(public_id, url))
    }

    async fn delete(&self, asset: &MediaAsset) -> Result<(), MediaError> {
        check_public_id(&asset.public_id)?;
        self.files.lock().map_err(poisoned)?.remove(&asset.public_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, bytes: &[u8]) -> Upload {
        Upload {
            file_name: Some(name.to_string()),
            content_type: None,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn extension_is_sanitized() {
        assert_eq!(upload("Me.PNG", b"").extension().as_deref(), Some("png"));
        assert_eq!(upload("cv", b"").extension(), None);
        assert_eq!(upload("x.p/ng", b"").extension(), None);
        assert_eq!(upload("evil.sh;rm", b"").extension(), None);
    }

    #[test]
    fn public_ids_reject_traversal() {
        assert!(check_public_id("avatars/0190.png").is_ok());
        assert!(check_public_id("../etc/passwd").is_err());
        assert!(check_public_id("avatars/../../x").is_err());
        assert!(check_public_id("avatars").is_err());
        assert!(check_public_id("avatars/.hidden").is_err());
    }

    #[tokio::test]
    async fn local_store_writes_serves_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost:4000/");

        let asset = store
            .save(MediaFolder::Skills, upload("rust.svg", b"<svg/>"))
            .await
            .unwrap();
        assert!(asset.public_id.starts_with("skills/"));
        assert!(asset.public_id.ends_with(".svg"));
        assert_eq!(
            asset.url,
            format!("http://localhost:4000/uploads/{}", asset.public_id)
        );

        let path = dir.path().join(&asset.public_id);
        assert_eq!(std::fs::read(&path).unwrap(), b"<svg/>");

        store.delete(&asset).await.unwrap();
        assert!(!path.exists());
        // Second delete is a no-op.
        store.delete(&asset).await.unwrap();
    }

    #[tokio::test]
    async fn in_memory_store_tracks_files() {
        let store = InMemoryMediaStore::new();
        let asset = store
            .save(MediaFolder::Avatars, upload("me.jpg", b"jpeg"))
            .await
            .unwrap();
        assert!(store.contains(&asset.public_id));

        store.delete(&asset).await.unwrap();
        assert!(store.is_empty());
    }
}
