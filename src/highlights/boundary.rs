// SYNOID Boundary Refiner
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Picks a clip end that lands on a natural boundary: a complete sentence
// first, then a speech pause, a segment end, a word end, and finally the
// clamped request itself.
//
// Bounds are applied in two stages: the request is clamped into
// [start+min, start+max], then the search window may extend past it by
// SEARCH_EXTENSION_SECS, but never past start+max.

use super::lexicon::{has_terminal_punctuation, normalize_token, BoundaryLexicon};
use super::timing::{TimedWord, TranscriptTiming};
use super::types::ClipBounds;
use tracing::debug;

/// How far past the requested end a sentence may finish.
pub const SEARCH_EXTENSION_SECS: f64 = 2.0;
/// Trailing window scanned for pauses when no sentence end qualifies.
pub const PAUSE_LOOKBACK_SECS: f64 = 8.0;
/// Minimum silence that counts as a pause boundary.
pub const PAUSE_THRESHOLD_SECS: f64 = 0.35;

/// Weights and thresholds for scoring a sentence end. Times in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceEndWeights {
    pub distance_per_sec: f64,

    pub long_sentence_words: usize,
    pub long_sentence_bonus: f64,
    pub medium_sentence_words: usize,
    pub medium_sentence_bonus: f64,
    pub fragment_words: usize,
    pub fragment_penalty: f64,

    pub long_pause_secs: f64,
    pub long_pause_bonus: f64,
    pub short_pause_secs: f64,
    pub short_pause_bonus: f64,
    pub tight_pause_secs: f64,
    pub tight_pause_penalty: f64,

    pub closure_bonus: f64,
    pub dangling_tail_penalty: f64,

    pub open_question_pause_secs: f64,
    pub open_question_penalty: f64,

    pub continuation_pause_secs: f64,
    pub continuation_penalty: f64,

    pub tight_continuation_penalty: f64,

    pub weak_ending_words: usize,
    pub weak_ending_pause_secs: f64,
    pub weak_ending_penalty: f64,
}

impl Default for SentenceEndWeights {
    fn default() -> Self {
        Self {
            distance_per_sec: 0.30,

            long_sentence_words: 8,
            long_sentence_bonus: 1.1,
            medium_sentence_words: 5,
            medium_sentence_bonus: 0.5,
            fragment_words: 4,
            fragment_penalty: 0.8,

            long_pause_secs: 0.45,
            long_pause_bonus: 1.0,
            short_pause_secs: 0.25,
            short_pause_bonus: 0.4,
            tight_pause_secs: 0.12,
            tight_pause_penalty: 0.35,

            closure_bonus: 1.1,
            dangling_tail_penalty: 2.0,

            open_question_pause_secs: 0.45,
            open_question_penalty: 2.4,

            continuation_pause_secs: 0.35,
            continuation_penalty: 0.8,

            tight_continuation_penalty: 0.8,

            weak_ending_words: 5,
            weak_ending_pause_secs: 0.2,
            weak_ending_penalty: 0.9,
        }
    }
}

/// Features of one candidate sentence end, independent of text scanning.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceEnd {
    pub end: f64,
    pub word_count: usize,
    pub last_token: String,
    /// Lowercased sentence text.
    pub sentence: String,
    /// Normalized following token, `None` at the end of the transcript.
    pub next_token: Option<String>,
    pub pause_after: f64,
}

impl SentenceEnd {
    pub fn is_question(&self) -> bool {
        self.sentence.ends_with('?')
    }
}

pub fn score_sentence_end(
    candidate: &SentenceEnd,
    requested_end: f64,
    lexicon: &BoundaryLexicon,
    w: &SentenceEndWeights,
) -> f64 {
    let mut score = -w.distance_per_sec * (candidate.end - requested_end).abs();
    let pause = candidate.pause_after;
    let has_closure = lexicon.has_closure_cue(&candidate.sentence);

    if candidate.word_count >= w.long_sentence_words {
        score += w.long_sentence_bonus;
    } else if candidate.word_count >= w.medium_sentence_words {
        score += w.medium_sentence_bonus;
    } else if candidate.word_count < w.fragment_words {
        score -= w.fragment_penalty;
    }

    if pause >= w.long_pause_secs {
        score += w.long_pause_bonus;
    } else if pause >= w.short_pause_secs {
        score += w.short_pause_bonus;
    } else if pause < w.tight_pause_secs {
        score -= w.tight_pause_penalty;
    }

    if has_closure {
        score += w.closure_bonus;
    }
    if lexicon.is_dangling_tail(&candidate.last_token) {
        score -= w.dangling_tail_penalty;
    }
    if candidate.is_question() && pause < w.open_question_pause_secs {
        score -= w.open_question_penalty;
    }

    let next = candidate.next_token.as_deref();
    if next.is_some_and(|t| lexicon.is_continuation_start(t)) && pause < w.continuation_pause_secs {
        score -= w.continuation_penalty;
    }
    if next.is_some_and(|t| !t.is_empty()) && pause < w.tight_pause_secs {
        score -= w.tight_continuation_penalty;
    }
    if candidate.word_count < w.weak_ending_words
        && !has_closure
        && pause < w.weak_ending_pause_secs
    {
        score -= w.weak_ending_penalty;
    }

    score
}

/// Sentence-terminal words ending inside `[min_end, search_end]`, with the
/// sentence each one closes. Sentences never reach back before `clip_start`.
pub fn collect_sentence_ends(
    words: &[TimedWord],
    clip_start: f64,
    min_end: f64,
    search_end: f64,
) -> Vec<SentenceEnd> {
    let mut out = Vec::new();

    for (i, word) in words.iter().enumerate() {
        if word.end < min_end || word.end > search_end || !has_terminal_punctuation(&word.text) {
            continue;
        }

        let mut first = 0;
        for j in (0..i).rev() {
            if words[j].end <= clip_start || has_terminal_punctuation(&words[j].text) {
                first = j + 1;
                break;
            }
        }

        let mut parts: Vec<&str> = Vec::with_capacity(i + 1 - first);
        let mut word_count = 0;
        let mut last_token = String::new();
        for w in &words[first..=i] {
            if w.end <= clip_start {
                continue;
            }
            let text = w.text.trim();
            if text.is_empty() {
                continue;
            }
            parts.push(text);
            let token = normalize_token(text);
            if !token.is_empty() {
                word_count += 1;
                last_token = token;
            }
        }
        if parts.is_empty() {
            continue;
        }

        let (next_token, pause_after) = match words.get(i + 1) {
            Some(next) => (
                Some(normalize_token(&next.text)),
                (next.start - word.end).max(0.0),
            ),
            None => (None, 0.0),
        };

        out.push(SentenceEnd {
            end: word.end,
            word_count,
            last_token,
            sentence: parts.join(" ").to_lowercase(),
            next_token,
            pause_after,
        });
    }
    out
}

/// Stateless refiner parameterized by a lexicon and a weight table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryRefiner {
    pub lexicon: BoundaryLexicon,
    pub weights: SentenceEndWeights,
}

impl BoundaryRefiner {
    pub fn new(lexicon: BoundaryLexicon, weights: SentenceEndWeights) -> Self {
        Self { lexicon, weights }
    }

    /// Validate a requested `[start, requested_end]` and snap its end to a
    /// natural boundary. Returns `None` when no legal clip exists.
    pub fn normalize(
        &self,
        start: f64,
        requested_end: f64,
        bounds: ClipBounds,
        timing: &TranscriptTiming,
    ) -> Option<(f64, f64)> {
        if !bounds.is_valid() || requested_end <= start {
            return None;
        }
        let min_end = start + bounds.min_secs;
        let max_end = start + bounds.max_secs;
        let clamped = requested_end.min(max_end);
        if clamped < min_end {
            return None;
        }

        let end = self.natural_end(timing, start, clamped, min_end, max_end);
        if end < min_end {
            return None;
        }
        Some((start, end.min(max_end)))
    }

    fn natural_end(
        &self,
        timing: &TranscriptTiming,
        start: f64,
        requested_end: f64,
        min_end: f64,
        max_end: f64,
    ) -> f64 {
        let requested_end = requested_end.clamp(min_end, max_end);
        let search_end = (requested_end + SEARCH_EXTENSION_SECS).min(max_end);

        if let Some(end) = self.best_sentence_end(timing, start, requested_end, min_end, search_end)
        {
            debug!("[BOUNDARY] Sentence end at {:.2}s", end);
            return end;
        }
        if let Some(end) = pause_end(&timing.words, min_end, search_end) {
            debug!("[BOUNDARY] Pause end at {:.2}s", end);
            return end;
        }
        if let Some(end) = latest_within(timing.segment_ends.iter().copied(), min_end, search_end)
        {
            debug!("[BOUNDARY] Segment end at {:.2}s", end);
            return end;
        }
        if let Some(end) = latest_within(timing.words.iter().map(|w| w.end), min_end, search_end) {
            debug!("[BOUNDARY] Word end at {:.2}s", end);
            return end;
        }
        requested_end
    }

    fn best_sentence_end(
        &self,
        timing: &TranscriptTiming,
        start: f64,
        requested_end: f64,
        min_end: f64,
        search_end: f64,
    ) -> Option<f64> {
        let candidates = collect_sentence_ends(&timing.words, start, min_end, search_end);
        let mut best: Option<(f64, f64)> = None;
        for candidate in &candidates {
            let score = score_sentence_end(candidate, requested_end, &self.lexicon, &self.weights);
            let better = match best {
                None => true,
                Some((best_score, best_end)) => {
                    score > best_score || (score == best_score && candidate.end > best_end)
                }
            };
            if better {
                best = Some((score, candidate.end));
            }
        }
        best.map(|(_, end)| end)
    }
}

/// End of the word opening the widest pause in the trailing lookback window.
fn pause_end(words: &[TimedWord], min_end: f64, search_end: f64) -> Option<f64> {
    let window_start = (search_end - PAUSE_LOOKBACK_SECS).max(min_end);
    let mut best: Option<(f64, f64)> = None;
    for pair in words.windows(2) {
        let (cur, next) = (&pair[0], &pair[1]);
        if cur.end < window_start || cur.end > search_end || next.start <= cur.end {
            continue;
        }
        let gap = next.start - cur.end;
        if gap >= PAUSE_THRESHOLD_SECS && best.map_or(true, |(widest, _)| gap > widest) {
            best = Some((gap, cur.end));
        }
    }
    best.map(|(_, end)| end)
}

fn latest_within(times: impl Iterator<Item = f64>, low: f64, high: f64) -> Option<f64> {
    times
        .filter(|t| *t >= low && *t <= high)
        .max_by(f64::total_cmp)
}

/// [`BoundaryRefiner::normalize`] with the English lexicon and default weights.
pub fn normalize_clip_duration(
    start: f64,
    requested_end: f64,
    bounds: ClipBounds,
    timing: &TranscriptTiming,
) -> Option<(f64, f64)> {
    BoundaryRefiner::default().normalize(start, requested_end, bounds, timing)
}
