use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::application::ports::{AudioStorageError, AudioStorageProvider};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::{GcsStorageProvider, InMemoryStorageProvider, LocalStorageProvider};

pub struct StorageProviderFactory;

impl StorageProviderFactory {
    pub fn create(
        settings: &StorageSettings,
    ) -> Result<Arc<dyn AudioStorageProvider>, AudioStorageError> {
        match settings.provider {
            StorageProviderSetting::Gcs => Ok(Arc::new(GcsStorageProvider)),
            StorageProviderSetting::Local => {
                let base = settings.public_base_url.as_deref().ok_or_else(|| {
                    AudioStorageError::InvalidCredentials("public_base_url required".into())
                })?;
                let base = Url::parse(base)
                    .map_err(|e| AudioStorageError::InvalidCredentials(e.to_string()))?;
                Ok(Arc::new(LocalStorageProvider::new(
                    PathBuf::from(&settings.local_path),
                    base,
                )))
            }
            StorageProviderSetting::Memory => Ok(Arc::new(InMemoryStorageProvider::new())),
        }
    }
}
