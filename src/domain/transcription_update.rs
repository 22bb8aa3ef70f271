use chrono::{DateTime, Utc};

use super::transcription_status::{
    FAILED_ACTION_ITEMS_SENTINEL, FAILED_SUMMARY_SENTINEL, FAILED_TRANSCRIPT_SENTINEL,
    PROCESSING_SENTINEL,
};
use super::{Sentence, TranscriptionStatus};

/// What the provider produced for one recording.
///
/// `summary` holds the provider's full transcript text, not an abstractive summary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranscriptionOutcome {
    pub sentences: Vec<Sentence>,
    pub summary: String,
    pub action_items: Vec<String>,
}

/// The fields a transcription run overwrites on a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionUpdate {
    pub status: TranscriptionStatus,
    pub transcript: Vec<Sentence>,
    pub summary: String,
    pub action_items: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl TranscriptionUpdate {
    pub fn processing() -> Self {
        Self {
            status: TranscriptionStatus::Processing,
            transcript: vec![Sentence::placeholder(PROCESSING_SENTINEL)],
            summary: String::new(),
            action_items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// The status follows the written transcript, so an empty result leaves the recording
    /// `NotStarted` and eligible for another run.
    pub fn completed(outcome: TranscriptionOutcome) -> Self {
        Self {
            status: TranscriptionStatus::infer_from_transcript(&outcome.sentences),
            transcript: outcome.sentences,
            summary: outcome.summary,
            action_items: outcome.action_items,
            updated_at: Utc::now(),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: TranscriptionStatus::Failed,
            transcript: vec![Sentence::placeholder(FAILED_TRANSCRIPT_SENTINEL)],
            summary: FAILED_SUMMARY_SENTINEL.to_string(),
            action_items: vec![FAILED_ACTION_ITEMS_SENTINEL.to_string()],
            updated_at: Utc::now(),
        }
    }
}
