use std::fmt;
use std::str::FromStr;

use super::Sentence;

pub const PROCESSING_SENTINEL: &str = "Processing transcription...";
pub const FAILED_TRANSCRIPT_SENTINEL: &str = "Error transcribing audio after multiple attempts";
pub const FAILED_SUMMARY_SENTINEL: &str = "Error generating summary";
pub const FAILED_ACTION_ITEMS_SENTINEL: &str = "Error generating action items";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptionStatus {
    NotStarted,
    Processing,
    Done,
    Failed,
}

impl TranscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionStatus::NotStarted => "NOT_STARTED",
            TranscriptionStatus::Processing => "PROCESSING",
            TranscriptionStatus::Done => "DONE",
            TranscriptionStatus::Failed => "FAILED",
        }
    }

    /// The status a transcript implies on its own: empty means not started, a lone sentinel
    /// means processing or failed, anything else is done.
    pub fn infer_from_transcript(transcript: &[Sentence]) -> Self {
        match transcript {
            [] => TranscriptionStatus::NotStarted,
            [only] if only.text == PROCESSING_SENTINEL => TranscriptionStatus::Processing,
            [only] if only.text == FAILED_TRANSCRIPT_SENTINEL => TranscriptionStatus::Failed,
            _ => TranscriptionStatus::Done,
        }
    }

    /// Statuses a bucket scan is allowed to (re)start transcription from.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            TranscriptionStatus::NotStarted | TranscriptionStatus::Processing
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TranscriptionStatus::Done | TranscriptionStatus::Failed)
    }
}

impl FromStr for TranscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOT_STARTED" => Ok(TranscriptionStatus::NotStarted),
            "PROCESSING" => Ok(TranscriptionStatus::Processing),
            "DONE" => Ok(TranscriptionStatus::Done),
            "FAILED" => Ok(TranscriptionStatus::Failed),
            _ => Err(format!("Invalid transcription status: {}", s)),
        }
    }
}

impl fmt::Display for TranscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
