//! Transcript types produced by the speech-to-text collaborator.
//!
//! The on-disk format (`transcr.json`) is the raw collaborator response:
//! a full-text field plus an ordered word list where each entry carries a
//! `type` tag. Only entries tagged `word` are speech; spacing and audio
//! events are kept but ignored by sentence building.

use serde::{Deserialize, Serialize};

/// Whether a transcript entry is spoken text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WordKind {
    #[default]
    Spoken,
    /// Spacing, audio events, and anything else the collaborator emits.
    NonSpoken,
}

impl From<String> for WordKind {
    fn from(tag: String) -> Self {
        if tag == "word" {
            WordKind::Spoken
        } else {
            WordKind::NonSpoken
        }
    }
}

impl From<WordKind> for String {
    fn from(kind: WordKind) -> Self {
        match kind {
            WordKind::Spoken => "word".to_string(),
            WordKind::NonSpoken => "spacing".to_string(),
        }
    }
}

/// A single timestamped transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    #[serde(rename = "type", default)]
    pub kind: WordKind,
}

impl Word {
    /// Create a spoken word.
    pub fn spoken(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            kind: WordKind::Spoken,
        }
    }

    /// Create a non-spoken entry (spacing or audio event).
    pub fn non_spoken(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            kind: WordKind::NonSpoken,
        }
    }

    pub fn is_spoken(&self) -> bool {
        self.kind == WordKind::Spoken
    }
}

/// Full transcription result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Detected language, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,

    /// Complete transcript text, fed to metadata extraction.
    #[serde(default)]
    pub text: String,

    /// Ordered, time-monotonic word list.
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Transcript {
    /// Parse a transcript from collaborator JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of spoken words.
    pub fn spoken_word_count(&self) -> usize {
        self.words.iter().filter(|w| w.is_spoken()).count()
    }

    /// End time of the last entry, or zero when empty.
    pub fn span_end(&self) -> f64 {
        self.words.last().map(|w| w.end).unwrap_or(0.0)
    }
}
