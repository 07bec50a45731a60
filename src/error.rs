// SYNOID Highlights Error Types
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use thiserror::Error;

/// Errors surfaced by the highlight pipeline.
///
/// The pure highlight core never produces these: empty input yields empty
/// output. Ranker failures are logged and replaced by deterministic
/// selection, so they never surface here either.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Media tool error: {0}")]
    Media(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl HighlightError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, HighlightError>;
