// SYNOID Highlights Library
// Copyright (c) 2026 Xing_The_Creator | SYNOID

// Compile a regex literal once and reuse it.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

pub mod config;
pub mod error;
pub mod highlights;
pub mod manifest;
pub mod media;
pub mod pipeline;
pub mod ranker;
pub mod subtitles;
pub mod transcript;

pub use config::HighlightConfig;
pub use error::{HighlightError, Result};
pub use transcript::{Segment, Transcript, Word};
