use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::application::ports::{
    AudioStorageError, AudioStorageProvider, CredentialsRepository, RecordingRepository,
    RepositoryError,
};
use crate::domain::{Recording, RecordingId, Sentence, UserId};

#[derive(Debug, thiserror::Error)]
pub enum RecordingServiceError {
    #[error("recording {0} not found")]
    NotFound(RecordingId),
    #[error("{0}")]
    InvalidInput(String),
    #[error("no storage credentials for user {0}")]
    CredentialsNotFound(UserId),
    #[error("storage error: {0}")]
    Storage(#[from] AudioStorageError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Owner-scoped reads and edits of recordings.
pub struct RecordingService {
    recordings: Arc<dyn RecordingRepository>,
    credentials: Arc<dyn CredentialsRepository>,
    storage_provider: Arc<dyn AudioStorageProvider>,
    signed_url_ttl: Duration,
}

impl RecordingService {
    pub fn new(
        recordings: Arc<dyn RecordingRepository>,
        credentials: Arc<dyn CredentialsRepository>,
        storage_provider: Arc<dyn AudioStorageProvider>,
        signed_url_ttl: Duration,
    ) -> Self {
        Self {
            recordings,
            credentials,
            storage_provider,
            signed_url_ttl,
        }
    }

    pub async fn list(&self, owner_id: UserId) -> Result<Vec<Recording>, RecordingServiceError> {
        Ok(self.recordings.list_by_owner(owner_id).await?)
    }

    pub async fn get(
        &self,
        owner_id: UserId,
        id: RecordingId,
    ) -> Result<Recording, RecordingServiceError> {
        self.recordings
            .find_by_id(id, owner_id)
            .await?
            .ok_or(RecordingServiceError::NotFound(id))
    }

    /// Creates a recording without audio. It never enters the transcription pipeline.
    pub async fn create(
        &self,
        owner_id: UserId,
        name: String,
    ) -> Result<Recording, RecordingServiceError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(RecordingServiceError::InvalidInput(
                "name must not be empty".to_string(),
            ));
        }

        let mut recording = Recording::new(owner_id, name);
        recording.id = self.recordings.insert(&recording).await?;
        tracing::info!(recording_id = %recording.id, owner_id = %owner_id, "Recording created");
        Ok(recording)
    }

    pub async fn search(
        &self,
        owner_id: UserId,
        query: &str,
    ) -> Result<Vec<Recording>, RecordingServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RecordingServiceError::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }
        Ok(self.recordings.search(owner_id, query).await?)
    }

    /// Freshly signed URL for the recording's audio, or `None` when it has no audio.
    /// The URL is handed out only, never written back to the record.
    pub async fn audio_url(
        &self,
        owner_id: UserId,
        id: RecordingId,
    ) -> Result<Option<(String, Url)>, RecordingServiceError> {
        let recording = self.get(owner_id, id).await?;
        let Some(key) = recording.audio_key() else {
            return Ok(None);
        };

        let credentials = self
            .credentials
            .get(owner_id)
            .await?
            .ok_or(RecordingServiceError::CredentialsNotFound(owner_id))?;
        let storage = self.storage_provider.open(&credentials)?;
        let url = storage.signed_read_url(key, self.signed_url_ttl).await?;

        Ok(Some((key.as_str().to_string(), url)))
    }

    pub async fn update_transcript(
        &self,
        owner_id: UserId,
        id: RecordingId,
        transcript: Vec<Sentence>,
    ) -> Result<Recording, RecordingServiceError> {
        self.recordings
            .replace_transcript(id, owner_id, &transcript)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => RecordingServiceError::NotFound(id),
                other => RecordingServiceError::Repository(other),
            })?;
        tracing::info!(recording_id = %id, sentences = transcript.len(), "Transcript replaced");
        self.get(owner_id, id).await
    }
}
