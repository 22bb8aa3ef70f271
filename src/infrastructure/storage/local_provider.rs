use std::path::PathBuf;
use std::sync::Arc;

use object_store::local::LocalFileSystem;
use url::Url;

use crate::application::ports::{AudioStorage, AudioStorageError, AudioStorageProvider};
use crate::domain::StorageCredentials;

use super::base_url_signer::with_trailing_slash;
use super::{BaseUrlSigner, ObjectStoreAudioStorage};

/// Buckets as directories under `root`, served from `public_base_url/{bucket}/`.
pub struct LocalStorageProvider {
    root: PathBuf,
    public_base_url: Url,
}

impl LocalStorageProvider {
    pub fn new(root: PathBuf, public_base_url: Url) -> Self {
        Self {
            root,
            public_base_url: with_trailing_slash(public_base_url),
        }
    }
}

impl AudioStorageProvider for LocalStorageProvider {
    fn open(
        &self,
        credentials: &StorageCredentials,
    ) -> Result<Arc<dyn AudioStorage>, AudioStorageError> {
        let bucket = credentials.bucket.trim();
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == ".." {
            return Err(AudioStorageError::InvalidCredentials(format!(
                "invalid bucket name: {:?}",
                credentials.bucket
            )));
        }

        let path = self.root.join(bucket);
        std::fs::create_dir_all(&path)
            .map_err(|e| AudioStorageError::InvalidCredentials(e.to_string()))?;
        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| AudioStorageError::InvalidCredentials(e.to_string()))?;

        let base = self
            .public_base_url
            .join(&format!("{}/", bucket))
            .map_err(|e| AudioStorageError::InvalidCredentials(e.to_string()))?;

        Ok(Arc::new(ObjectStoreAudioStorage::new(
            Arc::new(store),
            Arc::new(BaseUrlSigner::new(base)),
        )))
    }
}
