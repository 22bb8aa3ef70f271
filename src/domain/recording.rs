use chrono::{DateTime, Utc};

use super::transcription_status::PROCESSING_SENTINEL;
use super::{
    ChatMessage, ObjectKey, RecordingId, Sentence, StoredObject, TranscriptionStatus,
    TranscriptionUpdate, UserId,
};

/// Pointer from a recording to its audio object.
///
/// `cached_url` is a convenience copy of the last signed URL handed out; it expires and is never
/// used to reach the object. The key is the source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioReference {
    pub object_key: ObjectKey,
    pub cached_url: String,
}

impl AudioReference {
    pub fn new(object_key: ObjectKey) -> Self {
        Self {
            object_key,
            cached_url: String::new(),
        }
    }

    pub fn with_cached_url(mut self, url: impl Into<String>) -> Self {
        self.cached_url = url.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub id: RecordingId,
    pub owner_id: UserId,
    pub name: String,
    pub audio: Option<AudioReference>,
    pub status: TranscriptionStatus,
    pub transcript: Vec<Sentence>,
    pub summary: String,
    pub action_items: Vec<String>,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recording {
    pub fn new(owner_id: UserId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: RecordingId::new(),
            owner_id,
            name,
            audio: None,
            status: TranscriptionStatus::NotStarted,
            transcript: Vec::new(),
            summary: String::new(),
            action_items: Vec::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_audio(owner_id: UserId, name: String, audio: AudioReference) -> Self {
        Self {
            audio: Some(audio),
            ..Self::new(owner_id, name)
        }
    }

    /// Record for an object found in the owner's bucket that no recording points at yet.
    /// Starts out as `Processing` because the scan kicks off transcription right away.
    pub fn discovered(owner_id: UserId, object: &StoredObject) -> Self {
        let mut recording = Self::with_audio(
            owner_id,
            object.key.display_name().to_string(),
            AudioReference::new(object.key.clone()),
        );
        recording.mark_processing();
        recording.created_at = object.created_at;
        recording.updated_at = object.updated_at;
        recording
    }

    /// Record for a file the owner just uploaded.
    pub fn uploaded(owner_id: UserId, name: String, audio: AudioReference) -> Self {
        let mut recording = Self::with_audio(owner_id, name, audio);
        recording.mark_processing();
        recording
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn audio_key(&self) -> Option<&ObjectKey> {
        self.audio.as_ref().map(|a| &a.object_key)
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Overwrites the transcription fields wholesale.
    pub fn apply(&mut self, update: &TranscriptionUpdate) {
        self.status = update.status;
        self.transcript = update.transcript.clone();
        self.summary = update.summary.clone();
        self.action_items = update.action_items.clone();
        self.updated_at = update.updated_at;
    }

    fn mark_processing(&mut self) {
        self.status = TranscriptionStatus::Processing;
        self.transcript = vec![Sentence::placeholder(PROCESSING_SENTINEL)];
    }
}
