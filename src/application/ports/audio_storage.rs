use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use url::Url;

use crate::domain::{ObjectKey, StorageCredentials, StoredObject};

/// One owner's bucket.
#[async_trait]
pub trait AudioStorage: Send + Sync {
    /// Objects in the provider's native listing order.
    fn list(&self) -> BoxStream<'_, Result<StoredObject, AudioStorageError>>;

    /// Time-limited URL the transcription provider can fetch the object from.
    async fn signed_read_url(
        &self,
        key: &ObjectKey,
        ttl: Duration,
    ) -> Result<Url, AudioStorageError>;

    async fn put(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), AudioStorageError>;
}

/// Opens the bucket described by a user's credentials.
pub trait AudioStorageProvider: Send + Sync {
    fn open(
        &self,
        credentials: &StorageCredentials,
    ) -> Result<Arc<dyn AudioStorage>, AudioStorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioStorageError {
    #[error("invalid storage credentials: {0}")]
    InvalidCredentials(String),
    #[error("listing failed: {0}")]
    ListFailed(String),
    #[error("signing failed: {0}")]
    SigningFailed(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
}
