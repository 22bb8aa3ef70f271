use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::application::ports::{ProviderError, TranscriptionClient};
use crate::domain::{Sentence, TranscriptionOutcome, Word};
use crate::infrastructure::observability::redact_signed_url;

use super::gladia_types::{
    AudioToLlmConfig, PollResponse, Segment, TranscriptionAccepted, TranscriptionRequest,
    TranscriptionResult,
};

pub const ACTION_ITEMS_PROMPT: &str =
    "Extract the key action items the transcription as bullet points";
pub const TITLE_PROMPT: &str = "Generate a title from this transcription";

const API_KEY_HEADER: &str = "x-gladia-key";
const STATUS_DONE: &str = "done";
const STATUS_ERROR: &str = "error";

pub const DEFAULT_BASE_URL: &str = "https://api.gladia.io";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_POLLS: u32 = 720;

/// Gladia v2 client: one submit, then polling of the returned `result_url` until the job is done.
pub struct GladiaClient {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl GladiaClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls.max(1);
        self
    }

    async fn submit(&self, audio_url: &Url, api_key: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v2/transcription/", self.base_url);
        let request = TranscriptionRequest {
            audio_url: audio_url.as_str(),
            diarization_enhanced: true,
            sentences: true,
            summarization: true,
            audio_to_llm: true,
            audio_to_llm_config: AudioToLlmConfig {
                prompts: [ACTION_ITEMS_PROMPT, TITLE_PROMPT],
            },
        };

        tracing::debug!(
            audio_url = %redact_signed_url(audio_url),
            "Submitting audio to Gladia"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::submit(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::submit(format!("status {}: {}", status, body)));
        }

        let accepted: TranscriptionAccepted = response
            .json()
            .await
            .map_err(|e| ProviderError::submit(format!("body: {}", e)))?;

        match accepted.result_url {
            Some(result_url) if !result_url.trim().is_empty() => {
                tracing::debug!(job_id = ?accepted.id, "Gladia accepted transcription job");
                Ok(result_url)
            }
            _ => Err(ProviderError::submit("no result URL in response")),
        }
    }

    async fn poll(
        &self,
        result_url: &str,
        api_key: &str,
    ) -> Result<TranscriptionResult, ProviderError> {
        for poll in 1..=self.max_polls {
            let response = self
                .client
                .get(result_url)
                .header(API_KEY_HEADER, api_key)
                .send()
                .await
                .map_err(|e| ProviderError::poll(format!("request: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                return Err(ProviderError::poll(format!("status {}: {}", status, body)));
            }

            let body: PollResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::poll(format!("body: {}", e)))?;

            match body.status.as_str() {
                STATUS_DONE => {
                    tracing::debug!(polls = poll, "Gladia transcription done");
                    return Ok(body.result.unwrap_or_default());
                }
                STATUS_ERROR => {
                    return Err(ProviderError::poll(format!(
                        "provider reported an error (code {})",
                        body.error_code
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "unknown".to_string())
                    )));
                }
                other => {
                    tracing::trace!(polls = poll, status = other, "Gladia transcription pending");
                    if poll < self.max_polls {
                        tokio::time::sleep(self.poll_interval).await;
                    }
                }
            }
        }

        Err(ProviderError::poll(format!(
            "transcription not done after {} polls",
            self.max_polls
        )))
    }
}

#[async_trait]
impl TranscriptionClient for GladiaClient {
    async fn submit_and_await(
        &self,
        audio_url: &Url,
        api_key: &str,
    ) -> Result<TranscriptionOutcome, ProviderError> {
        let result_url = self.submit(audio_url, api_key).await?;
        let result = self.poll(&result_url, api_key).await?;
        let outcome = map_result(result);

        tracing::info!(
            sentences = outcome.sentences.len(),
            action_items = outcome.action_items.len(),
            "Gladia transcription completed"
        );
        Ok(outcome)
    }
}

/// Sentences win over utterances; the full transcript becomes the summary; only answers to the
/// action-items prompt are kept, in provider order.
fn map_result(result: TranscriptionResult) -> TranscriptionOutcome {
    let transcription = result.transcription.unwrap_or_default();
    let segments = if transcription.sentences.is_empty() {
        transcription.utterances
    } else {
        transcription.sentences
    };

    let action_items = result
        .audio_to_llm
        .map(|llm| {
            llm.results
                .into_iter()
                .filter_map(|r| r.results)
                .filter(|r| r.prompt == ACTION_ITEMS_PROMPT)
                .map(|r| r.response)
                .collect()
        })
        .unwrap_or_default();

    TranscriptionOutcome {
        sentences: segments.into_iter().map(to_sentence).collect(),
        summary: transcription.full_transcript,
        action_items,
    }
}

fn to_sentence(segment: Segment) -> Sentence {
    let text = segment.sentence.or(segment.text).unwrap_or_default();
    let speaker = segment.speaker.and_then(|s| match s {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    let words = segment
        .words
        .into_iter()
        .map(|w| Word::new(w.word, w.start, w.end, w.confidence))
        .collect();

    Sentence::new(text, segment.start, segment.end, segment.confidence)
        .with_words(words)
        .with_speaker(speaker)
        .with_channel(segment.channel)
}
