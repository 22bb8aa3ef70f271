use std::sync::Arc;

use crate::application::ports::{CredentialsRepository, RepositoryError};
use crate::domain::{CredentialsDecodeError, StorageCredentials, UserId};

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error(transparent)]
    InvalidEncoding(#[from] CredentialsDecodeError),
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub struct CredentialsService {
    credentials: Arc<dyn CredentialsRepository>,
}

impl CredentialsService {
    pub fn new(credentials: Arc<dyn CredentialsRepository>) -> Self {
        Self { credentials }
    }

    #[tracing::instrument(skip_all, fields(owner_id = %owner_id, bucket = %bucket))]
    pub async fn save(
        &self,
        owner_id: UserId,
        encoded_credentials: String,
        bucket: String,
        provider_api_key: String,
    ) -> Result<StorageCredentials, CredentialsError> {
        if bucket.trim().is_empty() {
            return Err(CredentialsError::MissingField("bucket_name"));
        }
        if provider_api_key.trim().is_empty() {
            return Err(CredentialsError::MissingField("provider_api_key"));
        }

        let credentials =
            StorageCredentials::new(owner_id, encoded_credentials, bucket, provider_api_key);
        credentials.decode_credentials()?;

        self.credentials.upsert(&credentials).await?;
        tracing::info!("Storage credentials saved");
        Ok(credentials)
    }
}
