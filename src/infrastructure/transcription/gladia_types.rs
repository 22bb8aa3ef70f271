//! Wire types of the Gladia v2 pre-recorded transcription API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct TranscriptionRequest<'a> {
    pub audio_url: &'a str,
    pub diarization_enhanced: bool,
    pub sentences: bool,
    pub summarization: bool,
    pub audio_to_llm: bool,
    pub audio_to_llm_config: AudioToLlmConfig<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AudioToLlmConfig<'a> {
    pub prompts: [&'a str; 2],
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptionAccepted {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub result_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PollResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<TranscriptionResult>,
    #[serde(default)]
    pub error_code: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TranscriptionResult {
    #[serde(default)]
    pub transcription: Option<TranscriptionBody>,
    #[serde(default)]
    pub audio_to_llm: Option<AudioToLlm>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TranscriptionBody {
    #[serde(default)]
    pub full_transcript: String,
    #[serde(default)]
    pub sentences: Vec<Segment>,
    #[serde(default)]
    pub utterances: Vec<Segment>,
}

/// A sentence or an utterance. Sentences carry `sentence`, utterances carry `text`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Segment {
    #[serde(default)]
    pub sentence: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub speaker: Option<serde_json::Value>,
    #[serde(default)]
    pub channel: Option<u32>,
    #[serde(default)]
    pub words: Vec<SegmentWord>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SegmentWord {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AudioToLlm {
    #[serde(default)]
    pub results: Vec<LlmResult>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LlmResult {
    #[serde(default)]
    pub results: Option<LlmPromptResult>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LlmPromptResult {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub response: String,
}
