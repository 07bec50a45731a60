// SYNOID Transcript Timing Index
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use crate::transcript::Transcript;

/// A usable word with its absolute timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedWord {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Flattened, time-sorted view of a transcript. Built fresh per operation.
#[derive(Debug, Clone, Default)]
pub struct TranscriptTiming {
    pub words: Vec<TimedWord>,
    pub segment_ends: Vec<f64>,
}

impl TranscriptTiming {
    pub fn collect(transcript: &Transcript) -> Self {
        let mut words = Vec::with_capacity(transcript.word_count());
        let mut segment_ends = Vec::with_capacity(transcript.segments.len());

        for segment in &transcript.segments {
            if segment.end > 0.0 {
                segment_ends.push(segment.end);
            }
            for word in &segment.words {
                if !word.is_usable() {
                    continue;
                }
                words.push(TimedWord {
                    start: word.start,
                    end: word.end,
                    text: word.word.trim().to_string(),
                });
            }
        }

        // Stable sort keeps insertion order for identical (start, end) pairs.
        words.sort_by(|a, b| {
            a.start
                .total_cmp(&b.start)
                .then_with(|| a.end.total_cmp(&b.end))
        });
        segment_ends.sort_by(f64::total_cmp);

        Self {
            words,
            segment_ends,
        }
    }

    /// Words overlapping `(start, end)`, in time order.
    pub fn words_between(&self, start: f64, end: f64) -> impl Iterator<Item = &TimedWord> {
        self.words
            .iter()
            .filter(move |w| w.end > start && w.start < end)
    }

    /// Space-joined text of the words overlapping `(start, end)`.
    pub fn text_between(&self, start: f64, end: f64) -> String {
        self.words_between(start, end)
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Segment, Word};

    fn word(start: f64, end: f64, text: &str) -> Word {
        Word {
            start,
            end,
            word: text.to_string(),
        }
    }

    #[test]
    fn test_collect_sorts_and_filters() {
        let transcript = Transcript::new(vec![
            Segment {
                start: 5.0,
                end: 8.0,
                text: "later words".into(),
                words: vec![word(6.0, 6.5, " later "), word(7.0, 7.0, "broken")],
            },
            Segment {
                start: 0.0,
                end: 4.0,
                text: "early".into(),
                words: vec![word(1.0, 1.5, "early"), word(2.0, 2.5, "   ")],
            },
        ]);

        let timing = TranscriptTiming::collect(&transcript);
        assert_eq!(timing.words.len(), 2);
        assert_eq!(timing.words[0].text, "early");
        assert_eq!(timing.words[1].text, "later");
        assert_eq!(timing.segment_ends, vec![4.0, 8.0]);
    }

    #[test]
    fn test_empty_transcript() {
        let timing = TranscriptTiming::collect(&Transcript::default());
        assert!(timing.words.is_empty());
        assert!(timing.segment_ends.is_empty());
        assert_eq!(timing.text_between(0.0, 100.0), "");
    }

    #[test]
    fn test_text_between_uses_overlap() {
        let transcript = Transcript::new(vec![Segment {
            start: 0.0,
            end: 4.0,
            text: String::new(),
            words: vec![
                word(0.0, 0.9, "one"),
                word(1.0, 1.9, "two"),
                word(2.0, 2.9, "three"),
                word(3.0, 3.9, "four"),
            ],
        }]);
        let timing = TranscriptTiming::collect(&transcript);
        assert_eq!(timing.text_between(1.5, 3.0), "two three");
        assert_eq!(timing.text_between(0.9, 1.0), "");
        assert_eq!(timing.words_between(0.0, 4.0).count(), 4);
    }
}
