use std::sync::Arc;

use dashmap::DashMap;
use object_store::memory::InMemory;
use url::Url;

use crate::application::ports::{AudioStorage, AudioStorageError, AudioStorageProvider};
use crate::domain::StorageCredentials;

use super::{BaseUrlSigner, ObjectStoreAudioStorage};

/// Process-local buckets that live as long as the provider. Signed URLs use the `memory://`
/// scheme and cannot be fetched from outside.
#[derive(Default)]
pub struct InMemoryStorageProvider {
    buckets: DashMap<String, Arc<InMemory>>,
}

impl InMemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing store of a bucket, created on first use.
    pub fn bucket(&self, name: &str) -> Arc<InMemory> {
        self.buckets
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(InMemory::new()))
            .clone()
    }
}

impl AudioStorageProvider for InMemoryStorageProvider {
    fn open(
        &self,
        credentials: &StorageCredentials,
    ) -> Result<Arc<dyn AudioStorage>, AudioStorageError> {
        let base = Url::parse(&format!("memory://{}/", credentials.bucket))
            .map_err(|e| AudioStorageError::InvalidCredentials(e.to_string()))?;

        Ok(Arc::new(
            ObjectStoreAudioStorage::new(
                self.bucket(&credentials.bucket),
                Arc::new(BaseUrlSigner::new(base)),
            )
            .with_content_type_attributes(),
        ))
    }
}
