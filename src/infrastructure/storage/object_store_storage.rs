use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::path::Path as StorePath;
use object_store::signer::Signer;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use reqwest::Method;
use url::Url;

use crate::application::ports::{AudioStorage, AudioStorageError};
use crate::domain::{ObjectKey, StoredObject};

/// [`AudioStorage`] over any `object_store` backend plus a URL signer for it.
pub struct ObjectStoreAudioStorage {
    store: Arc<dyn ObjectStore>,
    signer: Arc<dyn Signer>,
    content_type_attributes: bool,
}

impl ObjectStoreAudioStorage {
    pub fn new(store: Arc<dyn ObjectStore>, signer: Arc<dyn Signer>) -> Self {
        Self {
            store,
            signer,
            content_type_attributes: false,
        }
    }

    /// Sends the content type as an object attribute on upload. Not every backend accepts
    /// attributes; the local filesystem store rejects them.
    pub fn with_content_type_attributes(mut self) -> Self {
        self.content_type_attributes = true;
        self
    }
}

#[async_trait::async_trait]
impl AudioStorage for ObjectStoreAudioStorage {
    fn list(&self) -> BoxStream<'_, Result<StoredObject, AudioStorageError>> {
        self.store
            .list(None)
            .map(|entry| {
                entry
                    .map(|meta| StoredObject {
                        key: ObjectKey::new(meta.location.to_string()),
                        size_bytes: meta.size as u64,
                        created_at: meta.last_modified,
                        updated_at: meta.last_modified,
                    })
                    .map_err(|e| AudioStorageError::ListFailed(e.to_string()))
            })
            .boxed()
    }

    async fn signed_read_url(
        &self,
        key: &ObjectKey,
        ttl: Duration,
    ) -> Result<Url, AudioStorageError> {
        let store_path = StorePath::from(key.as_str());
        self.signer
            .signed_url(Method::GET, &store_path, ttl)
            .await
            .map_err(|e| AudioStorageError::SigningFailed(e.to_string()))
    }

    async fn put(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), AudioStorageError> {
        let store_path = StorePath::from(key.as_str());
        let mut options = PutOptions::default();
        if self.content_type_attributes {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
            options.attributes = attributes;
        }

        self.store
            .put_opts(&store_path, PutPayload::from(data), options)
            .await
            .map_err(|e| AudioStorageError::UploadFailed(e.to_string()))?;
        Ok(())
    }
}
