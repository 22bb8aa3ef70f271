use serde::{Deserialize, Serialize};

/// One transcribed word with its timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    #[serde(rename = "word")]
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub confidence: f64,
}

/// A transcript segment as stored on a recording.
///
/// The serialized field names (`sentence`, `word`) are the ones existing clients read, so they
/// are kept even though the Rust fields are named `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(rename = "sentence")]
    pub text: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
}

impl Word {
    pub fn new(text: String, start: f64, end: f64, confidence: f64) -> Self {
        let (start, end) = ordered_offsets(start, end);
        Self {
            text,
            start,
            end,
            confidence: clamp_confidence(confidence),
        }
    }
}

impl Sentence {
    pub fn new(text: String, start: f64, end: f64, confidence: f64) -> Self {
        let (start, end) = ordered_offsets(start, end);
        Self {
            text,
            start,
            end,
            words: Vec::new(),
            confidence: clamp_confidence(confidence),
            speaker: None,
            channel: None,
        }
    }

    /// A zero-length sentence carrying only text, used for status sentinels.
    pub fn placeholder(text: &str) -> Self {
        Self::new(text.to_string(), 0.0, 0.0, 0.0)
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    pub fn with_speaker(mut self, speaker: Option<String>) -> Self {
        self.speaker = speaker;
        self
    }

    pub fn with_channel(mut self, channel: Option<u32>) -> Self {
        self.channel = channel;
        self
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn ordered_offsets(start: f64, end: f64) -> (f64, f64) {
    let start = if start.is_finite() { start.max(0.0) } else { 0.0 };
    let end = if end.is_finite() { end } else { start };
    (start, end.max(start))
}
