use async_trait::async_trait;

use crate::domain::{
    ChatMessage, ObjectKey, Recording, RecordingId, Sentence, TranscriptionUpdate, UserId,
};

use super::RepositoryError;

/// Document store for recordings.
///
/// Every owner-scoped read treats a record that belongs to somebody else exactly like a missing
/// one, so callers can never tell the two apart.
#[async_trait]
pub trait RecordingRepository: Send + Sync {
    async fn insert(&self, recording: &Recording) -> Result<RecordingId, RepositoryError>;

    async fn find_by_id(
        &self,
        id: RecordingId,
        owner_id: UserId,
    ) -> Result<Option<Recording>, RepositoryError>;

    async fn find_by_audio_object_key(
        &self,
        owner_id: UserId,
        key: &ObjectKey,
    ) -> Result<Option<Recording>, RepositoryError>;

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Recording>, RepositoryError>;

    /// Case-insensitive match on the recording name or any transcript sentence.
    async fn search(
        &self,
        owner_id: UserId,
        query: &str,
    ) -> Result<Vec<Recording>, RepositoryError>;

    /// Unconditional overwrite of the transcription fields. Concurrent writers race and the last
    /// one wins.
    async fn update_transcription_result(
        &self,
        id: RecordingId,
        update: &TranscriptionUpdate,
    ) -> Result<(), RepositoryError>;

    /// Returns `NotFound` when the recording is missing or owned by someone else.
    async fn append_message(
        &self,
        id: RecordingId,
        owner_id: UserId,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError>;

    /// Manual transcript edit; the status is derived from the new transcript. Returns `NotFound`
    /// when the recording is missing or foreign.
    async fn replace_transcript(
        &self,
        id: RecordingId,
        owner_id: UserId,
        transcript: &[Sentence],
    ) -> Result<(), RepositoryError>;
}
