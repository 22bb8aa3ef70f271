use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use super::UserId;

/// Per-user storage and provider secrets. Read-only for the transcription pipeline.
#[derive(Clone)]
pub struct StorageCredentials {
    pub owner_id: UserId,
    /// Service-account document, base64-encoded as it is stored at rest.
    pub encoded_credentials: String,
    pub bucket: String,
    pub provider_api_key: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
#[error("stored credentials are not valid base64: {0}")]
pub struct CredentialsDecodeError(#[from] base64::DecodeError);

impl StorageCredentials {
    pub fn new(
        owner_id: UserId,
        encoded_credentials: String,
        bucket: String,
        provider_api_key: String,
    ) -> Self {
        Self {
            owner_id,
            encoded_credentials,
            bucket,
            provider_api_key,
            updated_at: Utc::now(),
        }
    }

    pub fn decode_credentials(&self) -> Result<Vec<u8>, CredentialsDecodeError> {
        Ok(STANDARD.decode(self.encoded_credentials.trim())?)
    }
}

impl fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("owner_id", &self.owner_id)
            .field("encoded_credentials", &"[REDACTED]")
            .field("bucket", &self.bucket)
            .field("provider_api_key", &"[REDACTED]")
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
