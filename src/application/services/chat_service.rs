use std::sync::Arc;

use crate::application::ports::{CredentialsRepository, RecordingRepository, RepositoryError};
use crate::domain::{ChatMessage, Recording, RecordingId, TranscriptionStatus, UserId};

use super::{TranscriptionOrchestrator, TranscriptionTask, TranscriptionTrigger};

#[derive(Debug)]
pub struct MessageAdded {
    pub message: ChatMessage,
    /// The recording with the new message at the end of its history.
    pub recording: Recording,
    /// Present when this message was the first on a recording that had not been transcribed.
    pub transcription: Option<TranscriptionTask>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("recording {0} not found")]
    RecordingNotFound(RecordingId),
    #[error("message content must not be empty")]
    EmptyMessage,
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub struct ChatService {
    recordings: Arc<dyn RecordingRepository>,
    credentials: Arc<dyn CredentialsRepository>,
    orchestrator: Arc<TranscriptionOrchestrator>,
}

impl ChatService {
    pub fn new(
        recordings: Arc<dyn RecordingRepository>,
        credentials: Arc<dyn CredentialsRepository>,
        orchestrator: Arc<TranscriptionOrchestrator>,
    ) -> Self {
        Self {
            recordings,
            credentials,
            orchestrator,
        }
    }

    /// Appends a chat message. The first message on a recording with audio that was never
    /// transcribed starts its transcription in the background.
    #[tracing::instrument(skip(self, content), fields(owner_id = %owner_id, recording_id = %recording_id))]
    pub async fn add_message(
        &self,
        owner_id: UserId,
        recording_id: RecordingId,
        content: String,
    ) -> Result<MessageAdded, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let mut recording = self
            .recordings
            .find_by_id(recording_id, owner_id)
            .await?
            .ok_or(ChatError::RecordingNotFound(recording_id))?;
        let first_message = recording.messages.is_empty();

        let message = ChatMessage::new(owner_id, content);
        self.recordings
            .append_message(recording_id, owner_id, &message)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => ChatError::RecordingNotFound(recording_id),
                other => ChatError::Repository(other),
            })?;
        recording.messages.push(message.clone());
        recording.updated_at = message.timestamp;

        if !first_message
            || !recording.has_audio()
            || recording.status != TranscriptionStatus::NotStarted
        {
            return Ok(MessageAdded {
                message,
                recording,
                transcription: None,
            });
        }

        let transcription = match self.credentials.get(owner_id).await? {
            Some(credentials) => self.orchestrator.spawn(
                recording_id,
                credentials,
                TranscriptionTrigger::FirstMessage,
            ),
            None => {
                tracing::debug!("No storage credentials, leaving recording untranscribed");
                None
            }
        };

        Ok(MessageAdded {
            message,
            recording,
            transcription,
        })
    }
}
