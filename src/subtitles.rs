// SYNOID Clip Subtitles
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Per-clip ASS files for burn-in. Word timings become karaoke lines with
// clip-local times; without word timings the overlapping segment text is shown
// as one plain event for the whole clip.

use crate::highlights::TranscriptTiming;
use crate::transcript::Transcript;
use std::fmt::Write;

/// Longest subtitle line, in characters.
const LINE_CHAR_BUDGET: usize = 42;
/// Most words on one subtitle line.
const LINE_WORD_BUDGET: usize = 9;

const ASS_HEADER: &str = "[Script Info]
ScriptType: v4.00+
PlayResX: 1920
PlayResY: 1080
ScaledBorderAndShadow: yes

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Highlight, Inter, 78, &H00FFFFFF, &H00FFD200, &H00000000, &H64000000, 1,0,0,0,100,100,0,0,1,6,2,2, 80,80,85,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

#[derive(Debug, Clone, PartialEq)]
struct ClipWord {
    start: f64,
    end: f64,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    start: f64,
    end: f64,
    words: Vec<ClipWord>,
}

/// ASS document for the clip `[start, end]`.
pub fn render_clip_ass(
    transcript: &Transcript,
    timing: &TranscriptTiming,
    start: f64,
    end: f64,
) -> String {
    let words = clip_words(timing, start, end);
    if words.is_empty() {
        let text = segment_text(transcript, start, end);
        return render_plain(&text, end - start);
    }
    render_karaoke(&pack_lines(words))
}

fn clip_words(timing: &TranscriptTiming, start: f64, end: f64) -> Vec<ClipWord> {
    timing
        .words_between(start, end)
        .map(|w| ClipWord {
            start: w.start.max(start) - start,
            end: w.end.min(end) - start,
            text: sanitize(&w.text),
        })
        .filter(|w| !w.text.is_empty())
        .collect()
}

fn segment_text(transcript: &Transcript, start: f64, end: f64) -> String {
    transcript
        .segments
        .iter()
        .filter(|s| s.end > start && s.start < end)
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Greedy packing under the character and word budgets.
fn pack_lines(words: Vec<ClipWord>) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<ClipWord> = Vec::new();
    let mut chars = 0;

    for word in words {
        let len = word.text.chars().count();
        let next = if current.is_empty() { len } else { chars + 1 + len };
        if !current.is_empty() && (current.len() >= LINE_WORD_BUDGET || next > LINE_CHAR_BUDGET) {
            lines.push(close_line(std::mem::take(&mut current)));
            chars = 0;
        }
        chars = if current.is_empty() { len } else { chars + 1 + len };
        current.push(word);
    }
    if !current.is_empty() {
        lines.push(close_line(current));
    }
    lines
}

fn close_line(words: Vec<ClipWord>) -> Line {
    Line {
        start: words.first().map_or(0.0, |w| w.start),
        end: words.last().map_or(0.0, |w| w.end),
        words,
    }
}

fn render_karaoke(lines: &[Line]) -> String {
    let mut out = String::from(ASS_HEADER);
    for line in lines {
        let _ = write!(
            out,
            "Dialogue: 0,{},{},Highlight,,0,0,0,,",
            ass_time(line.start),
            ass_time(line.end)
        );
        for word in &line.words {
            let centis = (((word.end - word.start) * 100.0) as i64).max(1);
            let _ = write!(out, "{{\\k{}}}{} ", centis, word.text);
        }
        out.push('\n');
    }
    out
}

fn render_plain(text: &str, duration: f64) -> String {
    let mut out = String::from(ASS_HEADER);
    let _ = writeln!(
        out,
        "Dialogue: 0,{},{},Highlight,,0,0,0,,{}",
        ass_time(0.0),
        ass_time(duration),
        sanitize(text)
    );
    out
}

/// `H:MM:SS.cc`, clamped at zero.
pub fn ass_time(secs: f64) -> String {
    let centis = (secs.max(0.0) * 100.0 + 1e-6) as u64;
    let (h, rest) = (centis / 360_000, centis % 360_000);
    let (m, rest) = (rest / 6_000, rest % 6_000);
    let (s, cs) = (rest / 100, rest % 100);
    format!("{}:{:02}:{:02}.{:02}", h, m, s, cs)
}

/// Keep transcript text from being read as ASS override tags.
fn sanitize(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('{', "(")
        .replace('}', ")")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Segment, Word};

    fn transcript(words: Vec<Word>, text: &str) -> Transcript {
        let end = words.last().map_or(10.0, |w| w.end);
        Transcript::new(vec![Segment {
            start: 0.0,
            end,
            text: text.to_string(),
            words,
        }])
    }

    fn word(start: f64, end: f64, text: &str) -> Word {
        Word {
            start,
            end,
            word: text.to_string(),
        }
    }

    #[test]
    fn test_karaoke_tags_and_local_times() {
        let t = transcript(
            vec![word(10.0, 10.3, "Hello"), word(10.3, 10.8, "world")],
            "Hello world",
        );
        let timing = TranscriptTiming::collect(&t);
        let ass = render_clip_ass(&t, &timing, 10.0, 12.0);
        assert!(ass.contains("{\\k30}Hello {\\k50}world"), "{}", ass);
        assert!(ass.contains("Dialogue: 0,0:00:00.00,0:00:00.80,"));
    }

    #[test]
    fn test_long_clips_keep_tail_words() {
        let words: Vec<Word> = (0..30)
            .map(|i| word(i as f64 * 0.4, i as f64 * 0.4 + 0.35, &format!("w{}", i)))
            .collect();
        let t = transcript(words, "");
        let timing = TranscriptTiming::collect(&t);
        let ass = render_clip_ass(&t, &timing, 0.0, 12.0);
        assert!(ass.contains("w29"));
        assert!(ass.matches("Dialogue:").count() >= 3);
    }

    #[test]
    fn test_plain_fallback_without_words() {
        let t = transcript(Vec::new(), " We {shipped} it. ");
        let timing = TranscriptTiming::collect(&t);
        let ass = render_clip_ass(&t, &timing, 0.0, 25.0);
        let last = ass.lines().last().unwrap();
        assert_eq!(
            last,
            "Dialogue: 0,0:00:00.00,0:00:25.00,Highlight,,0,0,0,,We (shipped) it."
        );
    }

    #[test]
    fn test_line_budgets() {
        let words: Vec<ClipWord> = (0..12)
            .map(|i| ClipWord {
                start: i as f64,
                end: i as f64 + 0.5,
                text: "ab".into(),
            })
            .collect();
        let lines = pack_lines(words);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].words.len(), LINE_WORD_BUDGET);
        assert_eq!(lines[1].start, 9.0);

        let long: Vec<ClipWord> = (0..3)
            .map(|i| ClipWord {
                start: i as f64,
                end: i as f64 + 0.5,
                text: "x".repeat(20),
            })
            .collect();
        assert_eq!(pack_lines(long).len(), 3);
    }

    #[test]
    fn test_ass_time_format() {
        assert_eq!(ass_time(61.234), "0:01:01.23");
        assert_eq!(ass_time(-3.0), "0:00:00.00");
        assert_eq!(ass_time(3_725.5), "1:02:05.50");
    }
}
