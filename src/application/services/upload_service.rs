use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;

use crate::application::ports::{
    AudioStorageError, AudioStorageProvider, CredentialsRepository, RecordingRepository,
    RepositoryError,
};
use crate::domain::{AudioReference, ObjectKey, Recording, UserId};

use super::{TranscriptionOrchestrator, TranscriptionTask, TranscriptionTrigger};

#[derive(Debug)]
pub struct UploadedRecording {
    pub recording: Recording,
    pub transcription: Option<TranscriptionTask>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("uploaded file is empty")]
    EmptyFile,
    #[error("no storage credentials for user {0}")]
    CredentialsNotFound(UserId),
    #[error("storage error: {0}")]
    Storage(#[from] AudioStorageError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Stores an uploaded audio file in the owner's bucket and registers it as a recording.
///
/// The object write and the record insert are not atomic: if signing or the insert fails the
/// object stays in the bucket without a recording. The next bucket scan picks it up.
pub struct UploadService {
    recordings: Arc<dyn RecordingRepository>,
    credentials: Arc<dyn CredentialsRepository>,
    storage_provider: Arc<dyn AudioStorageProvider>,
    orchestrator: Arc<TranscriptionOrchestrator>,
}

impl UploadService {
    pub fn new(
        recordings: Arc<dyn RecordingRepository>,
        credentials: Arc<dyn CredentialsRepository>,
        storage_provider: Arc<dyn AudioStorageProvider>,
        orchestrator: Arc<TranscriptionOrchestrator>,
    ) -> Self {
        Self {
            recordings,
            credentials,
            storage_provider,
            orchestrator,
        }
    }

    #[tracing::instrument(skip(self, data), fields(owner_id = %owner_id, size = data.len()))]
    pub async fn upload(
        &self,
        owner_id: UserId,
        filename: &str,
        data: Bytes,
    ) -> Result<UploadedRecording, UploadError> {
        if data.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let credentials = self
            .credentials
            .get(owner_id)
            .await?
            .ok_or(UploadError::CredentialsNotFound(owner_id))?;
        let storage = self.storage_provider.open(&credentials)?;

        let key = ObjectKey::for_upload(filename, Utc::now());
        storage.put(&key, data, key.content_type()).await?;
        tracing::info!(object_key = %key, "Audio uploaded");

        let object_key = key.to_string();
        let url = match storage.signed_read_url(&key, self.signed_url_ttl()).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    object_key = %object_key,
                    error = %e,
                    "Signing failed after upload; object left orphaned"
                );
                return Err(e.into());
            }
        };

        let mut recording = Recording::uploaded(
            owner_id,
            upload_name(filename, &key),
            AudioReference::new(key).with_cached_url(url.as_str()),
        );
        recording.id = match self.recordings.insert(&recording).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    object_key = %object_key,
                    error = %e,
                    "Recording insert failed after upload; object left orphaned"
                );
                return Err(e.into());
            }
        };

        let transcription = self.orchestrator.spawn(
            recording.id,
            credentials,
            TranscriptionTrigger::Upload,
        );

        Ok(UploadedRecording {
            recording,
            transcription,
        })
    }

    fn signed_url_ttl(&self) -> Duration {
        self.orchestrator.policy().signed_url_ttl
    }
}

fn upload_name(filename: &str, key: &ObjectKey) -> String {
    match filename.rsplit(['/', '\\']).next() {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => key.file_name().to_string(),
    }
}
