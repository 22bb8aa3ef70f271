use std::sync::Arc;

use object_store::gcp::GoogleCloudStorageBuilder;

use crate::application::ports::{AudioStorage, AudioStorageError, AudioStorageProvider};
use crate::domain::StorageCredentials;

use super::ObjectStoreAudioStorage;

/// Opens Google Cloud Storage buckets with the owner's service-account key. Signed URLs are
/// V4 URLs produced by the same client.
pub struct GcsStorageProvider;

impl AudioStorageProvider for GcsStorageProvider {
    fn open(
        &self,
        credentials: &StorageCredentials,
    ) -> Result<Arc<dyn AudioStorage>, AudioStorageError> {
        let key = credentials
            .decode_credentials()
            .map_err(|e| AudioStorageError::InvalidCredentials(e.to_string()))?;
        let key = String::from_utf8(key).map_err(|_| {
            AudioStorageError::InvalidCredentials("service account key is not UTF-8".into())
        })?;

        let store = GoogleCloudStorageBuilder::new()
            .with_service_account_key(key)
            .with_bucket_name(&credentials.bucket)
            .build()
            .map_err(|e| AudioStorageError::InvalidCredentials(e.to_string()))?;
        let store = Arc::new(store);

        Ok(Arc::new(
            ObjectStoreAudioStorage::new(store.clone(), store).with_content_type_attributes(),
        ))
    }
}
