use std::fmt;

use chrono::{DateTime, Utc};

const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Name of an object inside a user's storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for a freshly uploaded file: `{unix_nanos}_{filename}`, with any client-supplied
    /// directory components dropped.
    pub fn for_upload(filename: &str, at: DateTime<Utc>) -> Self {
        let base = filename
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("audio");
        let nanos = at.timestamp_nanos_opt().unwrap_or_else(|| at.timestamp_micros() * 1000);
        Self(format!("{}_{}", nanos, base))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment of the key.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// File name with its extension removed. Dot-files keep their full name.
    pub fn display_name(&self) -> &str {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(idx) if idx > 0 => &file_name[..idx],
            _ => file_name,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < file_name.len() => Some(&file_name[idx + 1..]),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        let Some(ext) = self.extension() else {
            return DEFAULT_AUDIO_CONTENT_TYPE;
        };
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "m4a" | "mp4" => "audio/mp4",
            "aac" => "audio/aac",
            "ogg" | "oga" => "audio/ogg",
            "opus" => "audio/opus",
            "flac" => "audio/flac",
            "webm" => "audio/webm",
            _ => DEFAULT_AUDIO_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
