// SYNOID Boundary Lexicon
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Word lists the boundary refiner consults. Tuned for spoken English; other
// locales supply their own tables without touching the scoring math.

/// Phrases that signal a concluding thought.
const ENGLISH_CLOSURE_CUES: &[&str] = &[
    "that's it",
    "that is it",
    "that's why",
    "that's how",
    "there you go",
    "we're out",
    "we are out",
    "i'm out",
    "i am out",
    "goodbye",
    "finally",
    "done",
    "finished",
    "let's go",
    "lets go",
    "we won",
    "i won",
    "you won",
    "we did it",
];

/// Function words that leave a sentence hanging when they end it.
const ENGLISH_DANGLING_TAILS: &[&str] = &[
    "and", "but", "or", "so", "because", "if", "when", "then", "to", "of", "for", "with", "from",
    "into", "onto", "the", "a", "an", "this", "that", "these", "those", "my", "your", "our",
    "their", "his", "her", "its",
];

/// Words that open a continuation of the previous sentence.
const ENGLISH_CONTINUATION_STARTERS: &[&str] = &[
    "and", "but", "or", "so", "because", "then", "if", "when", "while", "that",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryLexicon {
    pub closure_cues: &'static [&'static str],
    pub dangling_tails: &'static [&'static str],
    pub continuation_starters: &'static [&'static str],
}

impl BoundaryLexicon {
    pub const fn english() -> Self {
        Self {
            closure_cues: ENGLISH_CLOSURE_CUES,
            dangling_tails: ENGLISH_DANGLING_TAILS,
            continuation_starters: ENGLISH_CONTINUATION_STARTERS,
        }
    }

    /// `sentence` is expected lowercase.
    pub fn has_closure_cue(&self, sentence: &str) -> bool {
        self.closure_cues.iter().any(|cue| sentence.contains(cue))
    }

    /// An empty token is treated as dangling.
    pub fn is_dangling_tail(&self, token: &str) -> bool {
        token.is_empty() || self.dangling_tails.contains(&token)
    }

    pub fn is_continuation_start(&self, token: &str) -> bool {
        self.continuation_starters.contains(&token)
    }
}

impl Default for BoundaryLexicon {
    fn default() -> Self {
        Self::english()
    }
}

/// Lowercase, trimmed, with surrounding quotes, brackets and punctuation removed.
pub fn normalize_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .trim_matches(|c: char| "\"'`[](){}.,!?;:".contains(c))
        .to_string()
}

/// True when the token ends a sentence (`.`, `!` or `?`), ignoring trailing
/// quotes and closing brackets.
pub fn has_terminal_punctuation(raw: &str) -> bool {
    let stripped = raw
        .trim()
        .trim_end_matches(|c: char| "\"'`)]}".contains(c));
    matches!(stripped.chars().last(), Some('.' | '!' | '?'))
}
