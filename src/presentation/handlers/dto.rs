use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, Recording, Sentence};

/// A recording as clients see it. Field names follow the existing conversation API.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub audio_file: Option<AudioFileResponse>,
    pub transcript: Vec<Sentence>,
    pub chat_history: Vec<ChatMessageResponse>,
    pub summary: String,
    pub action_items: Vec<String>,
    pub transcription_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AudioFileResponse {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            user_id: message.user_id.to_string(),
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

impl From<Recording> for ConversationResponse {
    fn from(recording: Recording) -> Self {
        Self {
            id: recording.id.to_string(),
            user_id: recording.owner_id.to_string(),
            name: recording.name,
            audio_file: recording.audio.map(|audio| AudioFileResponse {
                name: audio.object_key.as_str().to_string(),
                url: audio.cached_url,
            }),
            transcript: recording.transcript,
            chat_history: recording
                .messages
                .iter()
                .map(ChatMessageResponse::from)
                .collect(),
            summary: recording.summary,
            action_items: recording.action_items,
            transcription_status: recording.status.as_str().to_string(),
            created_at: recording.created_at,
            updated_at: recording.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AudioUrlResponse {
    pub audio_file: Option<AudioFileResponse>,
}

#[derive(Debug, Serialize)]
pub struct NewConversationsResponse {
    pub new_conversations: Vec<ConversationResponse>,
}

#[derive(Debug, Serialize)]
pub struct BucketSyncFailedResponse {
    pub error: String,
    pub new_conversations: Vec<ConversationResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTranscriptRequest {
    pub transcript: Vec<Sentence>,
}

#[derive(Debug, Deserialize)]
pub struct SaveCredentialsRequest {
    pub credentials: String,
    pub bucket_name: String,
    #[serde(alias = "gladia_key")]
    pub provider_api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}
