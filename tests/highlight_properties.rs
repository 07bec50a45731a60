use synoid_highlights::highlights::{
    build_candidates, normalize_clip_duration, reconcile, score, Candidate, ClipBounds,
    TranscriptTiming, DISTINCT_GAP_SECS,
};
use synoid_highlights::{Segment, Transcript, Word};

fn word(start: f64, end: f64, text: &str) -> Word {
    Word {
        start,
        end,
        word: text.to_string(),
    }
}

/// One segment holding every word.
fn single_segment(words: Vec<Word>) -> Transcript {
    let start = words.first().map_or(0.0, |w| w.start);
    let end = words.last().map_or(0.0, |w| w.end);
    let text = words.iter().map(|w| w.word.as_str()).collect::<Vec<_>>().join(" ");
    Transcript::new(vec![Segment {
        start,
        end,
        text,
        words,
    }])
}

/// Unpunctuated words, one per second, covering `[from, to)`.
fn filler(from: u32, to: u32) -> Vec<Word> {
    (from..to)
        .map(|s| word(s as f64, s as f64 + 0.8, "word"))
        .collect()
}

fn bounds() -> ClipBounds {
    ClipBounds::new(20.0, 60.0)
}

#[test]
fn test_sparse_transcript_covers_the_tail() {
    let words: Vec<Word> = (0..300)
        .map(|k| word(k as f64 * 10.0, k as f64 * 10.0 + 0.5, &format!("w{}", k)))
        .collect();
    let transcript = single_segment(words);

    let candidates = build_candidates(&transcript, bounds());
    assert!(!candidates.is_empty());
    assert!(
        candidates.iter().any(|c| c.start >= 20.0 * 60.0),
        "latest start: {:?}",
        candidates.iter().map(|c| c.start).fold(0.0, f64::max)
    );
}

#[test]
fn test_candidates_respect_bounds() {
    let words: Vec<Word> = (0..900)
        .map(|k| {
            let s = k as f64 * 0.4;
            let text = if k % 15 == 14 { "done." } else { "talk" };
            word(s, s + 0.3, text)
        })
        .collect();
    let transcript = single_segment(words);

    let candidates = build_candidates(&transcript, bounds());
    assert!(!candidates.is_empty());
    assert!(candidates.len() <= 500);
    for c in &candidates {
        assert!(bounds().contains(c.duration()), "{:?}", (c.start, c.end));
        assert!((0.0..=10.0).contains(&c.info_score));
        assert!((0.0..=10.0).contains(&c.hook_score));
    }
}

#[test]
fn test_segment_only_transcript_still_yields_candidates() {
    let segments: Vec<Segment> = (0..20)
        .map(|k| Segment {
            start: k as f64 * 8.0,
            end: k as f64 * 8.0 + 7.5,
            text: format!("Step {} of the plan.", k + 1),
            words: Vec::new(),
        })
        .collect();
    let transcript = Transcript::new(segments);

    let candidates = build_candidates(&transcript, bounds());
    assert!(!candidates.is_empty());
    assert!(candidates.iter().all(|c| bounds().contains(c.duration())));
}

#[test]
fn test_invalid_bounds_produce_nothing() {
    let transcript = single_segment(filler(0, 200));
    assert!(build_candidates(&transcript, ClipBounds::new(60.0, 20.0)).is_empty());
    assert!(build_candidates(&transcript, ClipBounds::new(0.0, 20.0)).is_empty());
    assert!(build_candidates(&Transcript::default(), bounds()).is_empty());
}

#[test]
fn test_builder_and_scorer_are_deterministic() {
    let words: Vec<Word> = (0..400)
        .map(|k| word(k as f64 * 0.7, k as f64 * 0.7 + 0.5, &format!("t{}", k % 13)))
        .collect();
    let transcript = single_segment(words);
    assert_eq!(
        build_candidates(&transcript, bounds()),
        build_candidates(&transcript, bounds())
    );

    let text = "Here's the secret: step 3 is where 90% of people fail!";
    assert_eq!(score(text), score(text));
}

#[test]
fn test_score_sanity() {
    let empty = score("");
    assert_eq!((empty.info, empty.hook), (0.0, 0.0));
    assert!(score("Step 1: do X. Step 2: measure 42ms.").info > 0.0);
    assert!(score("Here is why this is important!").hook > 0.0);
}

#[test]
fn test_end_snaps_to_finished_sentence() {
    let mut words = filler(0, 53);
    words.push(word(53.0, 53.8, "almost"));
    words.push(word(54.0, 54.8, "there"));
    words.push(word(55.2, 56.0, "finished."));
    words.push(word(57.0, 57.6, "next"));
    let timing = TranscriptTiming::collect(&single_segment(words));

    assert_eq!(
        normalize_clip_duration(0.0, 60.0, bounds(), &timing),
        Some((0.0, 56.0))
    );
}

#[test]
fn test_end_backs_off_an_open_question() {
    let mut words = filler(0, 38);
    words.push(word(38.5, 39.2, "finally"));
    words.push(word(39.4, 40.0, "done."));
    for (k, text) in ["what", "do", "you", "think", "about", "it?"].iter().enumerate() {
        let s = 44.0 + k as f64;
        words.push(word(s, s + 0.9, text));
    }
    words.push(word(50.0, 50.4, "and"));
    words.extend((51..60).map(|s| word(s as f64 + 0.1, s as f64 + 0.9, "more")));
    let timing = TranscriptTiming::collect(&single_segment(words));

    assert_eq!(
        normalize_clip_duration(0.0, 49.9, bounds(), &timing),
        Some((0.0, 40.0))
    );
}

#[test]
fn test_fallback_selection_is_non_overlapping() {
    let cand = |start: f64, end: f64, total: f64| Candidate {
        start,
        end,
        text: format!("{}-{}", start, end),
        info_score: total,
        hook_score: 0.0,
    };
    let candidates = vec![cand(0.0, 40.0, 9.0), cand(20.0, 60.0, 8.0), cand(45.0, 85.0, 7.0)];

    let clips = reconcile(&candidates, None, 3, bounds(), &TranscriptTiming::default());
    assert_eq!(clips.len(), 2);
    assert!(clips[0].end <= clips[1].start);
    for (i, a) in clips.iter().enumerate() {
        assert!(bounds().contains(a.duration()));
        for b in &clips[i + 1..] {
            let overlaps = a.start < b.end + DISTINCT_GAP_SECS && a.end > b.start - DISTINCT_GAP_SECS;
            assert!(!overlaps);
        }
    }
}

#[test]
fn test_long_transcript_end_to_end_invariants() {
    let words: Vec<Word> = (0..1500)
        .map(|k| {
            let s = k as f64 * 0.45;
            let text = match k % 20 {
                0 => "Here's",
                9 => "why?",
                19 => "done.",
                _ => "stuff",
            };
            word(s, s + 0.35, text)
        })
        .collect();
    let transcript = single_segment(words);
    let timing = TranscriptTiming::collect(&transcript);
    let candidates = build_candidates(&transcript, bounds());

    let clips = reconcile(&candidates, None, 5, bounds(), &timing);
    assert_eq!(clips.len(), 5);
    for (i, a) in clips.iter().enumerate() {
        assert!(bounds().contains(a.duration()), "{:?}", a);
        for b in &clips[i + 1..] {
            let overlaps = a.start < b.end + DISTINCT_GAP_SECS && a.end > b.start - DISTINCT_GAP_SECS;
            assert!(!overlaps);
        }
    }
}
