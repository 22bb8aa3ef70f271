use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::domain::TranscriptionOutcome;

#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    /// Submits the audio at `audio_url` and waits until the provider finishes with it.
    async fn submit_and_await(
        &self,
        audio_url: &Url,
        api_key: &str,
    ) -> Result<TranscriptionOutcome, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderPhase {
    Submit,
    Poll,
}

impl fmt::Display for ProviderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderPhase::Submit => f.write_str("submit"),
            ProviderPhase::Poll => f.write_str("poll"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("transcription provider {phase} failed: {message}")]
pub struct ProviderError {
    pub phase: ProviderPhase,
    pub message: String,
}

impl ProviderError {
    pub fn submit(message: impl Into<String>) -> Self {
        Self {
            phase: ProviderPhase::Submit,
            message: message.into(),
        }
    }

    pub fn poll(message: impl Into<String>) -> Self {
        Self {
            phase: ProviderPhase::Poll,
            message: message.into(),
        }
    }
}
