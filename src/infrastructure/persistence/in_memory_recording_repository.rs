use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{RecordingRepository, RepositoryError};
use crate::domain::{
    ChatMessage, ObjectKey, Recording, RecordingId, Sentence, TranscriptionStatus,
    TranscriptionUpdate, UserId,
};

/// Process-local recording store with the same ownership and uniqueness rules as the Postgres
/// one.
#[derive(Default)]
pub struct InMemoryRecordingRepository {
    recordings: RwLock<HashMap<RecordingId, Recording>>,
}

impl InMemoryRecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.recordings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.recordings.read().await.is_empty()
    }
}

fn sorted_newest_first(mut recordings: Vec<Recording>) -> Vec<Recording> {
    recordings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recordings
}

#[async_trait]
impl RecordingRepository for InMemoryRecordingRepository {
    async fn insert(&self, recording: &Recording) -> Result<RecordingId, RepositoryError> {
        let mut recordings = self.recordings.write().await;

        if recordings.contains_key(&recording.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate recording id {}",
                recording.id
            )));
        }
        if let Some(key) = recording.audio_key() {
            let taken = recordings
                .values()
                .any(|r| r.owner_id == recording.owner_id && r.audio_key() == Some(key));
            if taken {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "audio object {} already has a recording",
                    key
                )));
            }
        }

        recordings.insert(recording.id, recording.clone());
        Ok(recording.id)
    }

    async fn find_by_id(
        &self,
        id: RecordingId,
        owner_id: UserId,
    ) -> Result<Option<Recording>, RepositoryError> {
        let recordings = self.recordings.read().await;
        Ok(recordings
            .get(&id)
            .filter(|r| r.is_owned_by(owner_id))
            .cloned())
    }

    async fn find_by_audio_object_key(
        &self,
        owner_id: UserId,
        key: &ObjectKey,
    ) -> Result<Option<Recording>, RepositoryError> {
        let recordings = self.recordings.read().await;
        Ok(recordings
            .values()
            .find(|r| r.is_owned_by(owner_id) && r.audio_key() == Some(key))
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Recording>, RepositoryError> {
        let recordings = self.recordings.read().await;
        Ok(sorted_newest_first(
            recordings
                .values()
                .filter(|r| r.is_owned_by(owner_id))
                .cloned()
                .collect(),
        ))
    }

    async fn search(
        &self,
        owner_id: UserId,
        query: &str,
    ) -> Result<Vec<Recording>, RepositoryError> {
        let needle = query.to_lowercase();
        let recordings = self.recordings.read().await;
        Ok(sorted_newest_first(
            recordings
                .values()
                .filter(|r| r.is_owned_by(owner_id))
                .filter(|r| {
                    r.name.to_lowercase().contains(&needle)
                        || r
                            .transcript
                            .iter()
                            .any(|s| s.text.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect(),
        ))
    }

    async fn update_transcription_result(
        &self,
        id: RecordingId,
        update: &TranscriptionUpdate,
    ) -> Result<(), RepositoryError> {
        let mut recordings = self.recordings.write().await;
        let recording = recordings
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        recording.apply(update);
        Ok(())
    }

    async fn append_message(
        &self,
        id: RecordingId,
        owner_id: UserId,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        let mut recordings = self.recordings.write().await;
        let recording = recordings
            .get_mut(&id)
            .filter(|r| r.is_owned_by(owner_id))
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        recording.messages.push(message.clone());
        recording.updated_at = Utc::now();
        Ok(())
    }

    async fn replace_transcript(
        &self,
        id: RecordingId,
        owner_id: UserId,
        transcript: &[Sentence],
    ) -> Result<(), RepositoryError> {
        let mut recordings = self.recordings.write().await;
        let recording = recordings
            .get_mut(&id)
            .filter(|r| r.is_owned_by(owner_id))
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        recording.transcript = transcript.to_vec();
        recording.status = TranscriptionStatus::infer_from_transcript(transcript);
        recording.updated_at = Utc::now();
        Ok(())
    }
}
