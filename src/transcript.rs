// SYNOID Transcript Model
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Segment/word timestamps as emitted by the transcriber. Segments are kept in
// insertion order, which is chronological for well-formed input.

use crate::error::{HighlightError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub start: f64,
    pub end: f64,
    pub word: String,
}

impl Word {
    /// A word is usable when it has positive duration and visible text.
    pub fn is_usable(&self) -> bool {
        self.end > self.start && !self.word.trim().is_empty()
    }
}

impl Transcript {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Load a transcriber JSON file (`{"segments": [...]}`).
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| HighlightError::io("read transcript", e))?;
        let transcript: Transcript = serde_json::from_str(&content)
            .map_err(|e| HighlightError::json("parse transcript", e))?;
        info!(
            "[TRANSCRIPT] Loaded {:?}: {} segments, {} words",
            path,
            transcript.segments.len(),
            transcript.word_count()
        );
        Ok(transcript)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Raw word count across all segments, including unusable words.
    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }
}
