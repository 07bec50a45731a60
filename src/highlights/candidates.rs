// SYNOID Candidate Window Builder
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Turns a transcript into a bounded set of scored time windows. Word
// timestamps drive the windows when present; segment ranges are the fallback.

use super::score::score;
use super::timing::{TimedWord, TranscriptTiming};
use super::types::{Candidate, ClipBounds};
use crate::transcript::Transcript;
use tracing::debug;

/// Upper bound on sampled window start positions.
pub const MAX_START_POSITIONS: usize = 140;
/// Longest window, in words.
pub const MAX_WINDOW_WORDS: usize = 240;
/// End pointer stride once past the first word of a window.
pub const END_STRIDE: usize = 4;
/// Global cap on emitted candidates.
pub const MAX_CANDIDATES: usize = 500;

pub fn build_candidates(transcript: &Transcript, bounds: ClipBounds) -> Vec<Candidate> {
    if transcript.is_empty() || !bounds.is_valid() {
        return Vec::new();
    }

    let timing = TranscriptTiming::collect(transcript);
    let from_words = build_word_windows(&timing.words, bounds);
    if !from_words.is_empty() {
        debug!(
            "[CANDIDATES] {} word-driven windows from {} words",
            from_words.len(),
            timing.words.len()
        );
        return from_words;
    }

    let from_segments = build_segment_windows(transcript, bounds);
    debug!(
        "[CANDIDATES] {} segment-driven windows from {} segments",
        from_segments.len(),
        transcript.segments.len()
    );
    from_segments
}

/// Sampled start indices: an even stride across the transcript plus the
/// latest index that can still open a minimum-length window.
fn sample_start_indices(words: &[TimedWord], min_secs: f64) -> Vec<usize> {
    let count = words.len();
    let stride = count.div_ceil(MAX_START_POSITIONS).max(1);
    let mut starts: Vec<usize> = (0..count).step_by(stride).collect();

    let last_end = words[count - 1].end;
    let tail = words
        .iter()
        .rposition(|w| last_end - w.start >= min_secs)
        .unwrap_or(0);
    if let Err(pos) = starts.binary_search(&tail) {
        starts.insert(pos, tail);
    }
    starts
}

fn build_word_windows(words: &[TimedWord], bounds: ClipBounds) -> Vec<Candidate> {
    if words.len() < 2 {
        return Vec::new();
    }

    let starts = sample_start_indices(words, bounds.min_secs);
    // Every start gets an equal share of the global cap, so the tail start
    // is never starved by dense early windows.
    let per_start = (MAX_CANDIDATES / starts.len()).max(1);

    let mut out = Vec::with_capacity(MAX_CANDIDATES.min(starts.len() * per_start));
    for &i in &starts {
        let ends = window_ends(words, i, bounds);
        for j in spread(&ends, per_start) {
            out.push(window_candidate(&words[i..=j]));
            if out.len() >= MAX_CANDIDATES {
                return out;
            }
        }
    }
    out
}

/// End indices of in-bounds windows opening at word `i`. The end pointer
/// widens one word, then every `END_STRIDE` words, until the window is longer
/// than `max` or reaches `MAX_WINDOW_WORDS`. The widest legal window is always
/// included.
fn window_ends(words: &[TimedWord], i: usize, bounds: ClipBounds) -> Vec<usize> {
    let limit = (i + MAX_WINDOW_WORDS - 1).min(words.len() - 1);
    let duration = |j: usize| words[j].end - words[i].start;

    let mut ends = Vec::new();
    let mut widest = None;
    let mut j = i;
    while j <= limit {
        if duration(j) > bounds.max_secs {
            break;
        }
        widest = Some(j);
        if bounds.contains(duration(j)) {
            ends.push(j);
        }
        let next = j + if j == i { 1 } else { END_STRIDE };
        j = if next > limit && j < limit { limit } else { next };
    }

    if let Some(mut k) = widest {
        while k < limit && duration(k + 1) <= bounds.max_secs {
            k += 1;
        }
        if bounds.contains(duration(k)) && ends.last() != Some(&k) {
            ends.push(k);
        }
    }
    ends
}

/// At most `n` items spread evenly from first to last.
fn spread(items: &[usize], n: usize) -> Vec<usize> {
    if items.len() <= n {
        return items.to_vec();
    }
    if n <= 1 {
        return items.first().copied().into_iter().collect();
    }
    let span = items.len() - 1;
    (0..n).map(|k| items[k * span / (n - 1)]).collect()
}

fn window_candidate(window: &[TimedWord]) -> Candidate {
    let text = window
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let s = score(&text);
    Candidate {
        start: window[0].start,
        end: window[window.len() - 1].end,
        text,
        info_score: s.info,
        hook_score: s.hook,
    }
}

fn build_segment_windows(transcript: &Transcript, bounds: ClipBounds) -> Vec<Candidate> {
    let segments = &transcript.segments;
    let mut out = Vec::new();

    for i in 0..segments.len() {
        let start = segments[i].start;
        let mut parts: Vec<&str> = Vec::new();
        for segment in &segments[i..] {
            let end = segment.end;
            if end - start > bounds.max_secs {
                break;
            }
            let piece = segment.text.trim();
            if !piece.is_empty() {
                parts.push(piece);
            }
            if end - start < bounds.min_secs || parts.is_empty() {
                continue;
            }

            let text = parts.join(" ");
            let s = score(&text);
            out.push(Candidate {
                start,
                end,
                text,
                info_score: s.info,
                hook_score: s.hook,
            });
            if out.len() >= MAX_CANDIDATES {
                return out;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Segment, Word};

    fn spaced_words(count: usize, spacing: f64, length: f64) -> Vec<Word> {
        (0..count)
            .map(|i| {
                let start = i as f64 * spacing;
                Word {
                    start,
                    end: start + length,
                    word: format!("w{}", i),
                }
            })
            .collect()
    }

    fn single_segment(words: Vec<Word>) -> Transcript {
        let end = words.last().map(|w| w.end).unwrap_or(0.0);
        Transcript::new(vec![Segment {
            start: 0.0,
            end,
            text: String::new(),
            words,
        }])
    }

    #[test]
    fn test_empty_transcript() {
        let cands = build_candidates(&Transcript::default(), ClipBounds::new(20.0, 60.0));
        assert!(cands.is_empty());
    }

    #[test]
    fn test_invalid_bounds_yield_nothing() {
        let transcript = single_segment(spaced_words(100, 0.5, 0.4));
        assert!(build_candidates(&transcript, ClipBounds::new(60.0, 20.0)).is_empty());
        assert!(build_candidates(&transcript, ClipBounds::new(0.0, 20.0)).is_empty());
    }

    #[test]
    fn test_segment_windows_respect_bounds() {
        let transcript = Transcript::new(vec![
            Segment {
                start: 0.0,
                end: 40.0,
                text: "A".into(),
                words: vec![],
            },
            Segment {
                start: 40.0,
                end: 90.0,
                text: "B".into(),
                words: vec![],
            },
        ]);
        let bounds = ClipBounds::new(20.0, 60.0);
        let cands = build_candidates(&transcript, bounds);
        assert!(!cands.is_empty());
        for c in &cands {
            assert!(bounds.contains(c.duration()), "duration {}", c.duration());
        }
    }

    #[test]
    fn test_word_windows_respect_bounds_and_cap() {
        // Dense speech: 3 words per second for 20 minutes.
        let transcript = single_segment(spaced_words(3_600, 1.0 / 3.0, 0.3));
        let bounds = ClipBounds::new(15.0, 45.0);
        let cands = build_candidates(&transcript, bounds);
        assert!(!cands.is_empty());
        assert!(cands.len() <= MAX_CANDIDATES);
        for c in &cands {
            assert!(bounds.contains(c.duration()), "duration {}", c.duration());
            assert!(c.text.split(' ').count() <= MAX_WINDOW_WORDS);
        }
        assert!(cands.iter().any(|c| c.start >= 1_000.0));
    }

    #[test]
    fn test_dense_windows_reach_max_length() {
        let transcript = single_segment(spaced_words(3_600, 1.0 / 3.0, 0.3));
        let cands = build_candidates(&transcript, ClipBounds::new(15.0, 45.0));
        let longest = cands.iter().map(Candidate::duration).fold(0.0, f64::max);
        let shortest = cands.iter().map(Candidate::duration).fold(f64::MAX, f64::min);
        assert!(longest > 44.0, "longest {}", longest);
        assert!(shortest < 16.0, "shortest {}", shortest);

        let transcript = single_segment(spaced_words(300, 0.5, 0.5));
        let cands = build_candidates(&transcript, ClipBounds::new(20.0, 60.0));
        let longest = cands.iter().map(Candidate::duration).fold(0.0, f64::max);
        assert!(longest > 55.0, "longest {}", longest);
        assert!(cands.iter().all(|c| c.duration() <= 60.0));
    }

    #[test]
    fn test_mid_length_windows_are_offered() {
        let transcript = single_segment(spaced_words(600, 0.5, 0.4));
        let cands = build_candidates(&transcript, ClipBounds::new(20.0, 60.0));
        assert!(cands.iter().any(|c| (30.0..=50.0).contains(&c.duration())));
    }

    #[test]
    fn test_spread_keeps_both_ends() {
        assert_eq!(spread(&[1, 2, 3], 5), vec![1, 2, 3]);
        assert_eq!(spread(&[0, 4, 8, 12, 16, 20, 24], 3), vec![0, 12, 24]);
        assert_eq!(spread(&[5, 9], 1), vec![5]);
        assert!(spread(&[], 3).is_empty());
    }

    #[test]
    fn test_covers_late_parts_of_dense_transcript() {
        let transcript = single_segment(spaced_words(300, 0.5, 0.5));
        let cands = build_candidates(&transcript, ClipBounds::new(20.0, 30.0));
        assert!(!cands.is_empty());
        assert!(cands.iter().any(|c| c.start >= 90.0));
    }

    #[test]
    fn test_tail_window_reaches_last_word() {
        let transcript = single_segment(spaced_words(300, 10.0, 0.5));
        let cands = build_candidates(&transcript, ClipBounds::new(20.0, 60.0));
        let last_end = 299.0 * 10.0 + 0.5;
        assert!(cands.iter().any(|c| (c.end - last_end).abs() < 1e-9));
    }

    #[test]
    fn test_single_word_falls_back_to_segments() {
        let transcript = Transcript::new(vec![Segment {
            start: 0.0,
            end: 25.0,
            text: "Only one timed word here".into(),
            words: vec![Word {
                start: 0.0,
                end: 0.5,
                word: "Only".into(),
            }],
        }]);
        let cands = build_candidates(&transcript, ClipBounds::new(20.0, 60.0));
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].text, "Only one timed word here");
    }

    #[test]
    fn test_window_text_is_space_joined() {
        let transcript = single_segment(spaced_words(3, 10.0, 0.5));
        let cands = build_candidates(&transcript, ClipBounds::new(20.0, 30.0));
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].text, "w0 w1 w2");
        assert_eq!(cands[0].start, 0.0);
        assert_eq!(cands[0].end, 20.5);
    }
}
