// SYNOID Highlight Scorer
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Cheap, deterministic text heuristics used to pre-rank candidate windows
// before the content ranker makes the final call.

/// Informativeness and hook strength of a piece of text, both in `[0, 10]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextScore {
    pub info: f64,
    pub hook: f64,
}

const NUMERAL_WEIGHT: f64 = 0.4;
const HOW_TO_BONUS: f64 = 1.2;
const LENGTH_PENALTY_PER_CHAR: f64 = 0.0006;
const HOOK_CUE_WEIGHT: f64 = 0.9;
const STEP_MARKER_WEIGHT: f64 = 0.4;
const QUESTION_WEIGHT: f64 = 0.7;
const EXCLAMATION_WEIGHT: f64 = 0.3;
const SCORE_CEILING: f64 = 10.0;

pub fn score(text: &str) -> TextScore {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return TextScore::default();
    }
    let lower = trimmed.to_lowercase();

    let numerals = regex!(r"\b\d+(?:[.,]\d+)?\b").find_iter(trimmed).count();
    let mut info = numerals as f64 * NUMERAL_WEIGHT;
    if regex!(r"\b(how\s+to|step\s+\d+|first|second|third|do\s+this)\b").is_match(&lower) {
        info += HOW_TO_BONUS;
    }
    // Long windows should not win on sheer size.
    info -= LENGTH_PENALTY_PER_CHAR * trimmed.chars().count() as f64;

    let cues = regex!(r"\b(important|key|secret|mistake|never|always|here\s+is\s+why|remember)\b")
        .find_iter(&lower)
        .count();
    let steps = regex!(r"\bstep\s+\d+\b").find_iter(&lower).count();
    let mut hook = cues as f64 * HOOK_CUE_WEIGHT;
    hook += steps as f64 * STEP_MARKER_WEIGHT;
    hook += trimmed.matches('?').count() as f64 * QUESTION_WEIGHT;
    hook += trimmed.matches('!').count() as f64 * EXCLAMATION_WEIGHT;

    TextScore {
        info: info.clamp(0.0, SCORE_CEILING),
        hook: hook.clamp(0.0, SCORE_CEILING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(score(""), TextScore::default());
        assert_eq!(score("   \n\t"), TextScore::default());
    }

    #[test]
    fn test_procedural_text_is_informative() {
        let s = score("Step 1: do X. Step 2: measure 42ms.");
        assert!(s.info > 0.0, "info = {}", s.info);
        assert!(s.hook > 0.0, "hook = {}", s.hook);
    }

    #[test]
    fn test_how_to_without_hook() {
        let s = score("How to fix it: first do this, then do that.");
        assert!(s.info > 0.0);
        assert_eq!(s.hook, 0.0);
    }

    #[test]
    fn test_hook_phrase() {
        let s = score("Here is why this is important!");
        assert_eq!(s.info, 0.0);
        assert!(s.hook > 0.0);
        // "here is why" + "important" + one exclamation
        assert!((s.hook - 2.1).abs() < 1e-9, "hook = {}", s.hook);
    }

    #[test]
    fn test_scores_are_clamped() {
        let noisy = "??????????????????????????????";
        assert_eq!(score(noisy).hook, SCORE_CEILING);

        let long = "word ".repeat(5_000);
        assert_eq!(score(&long).info, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let text = "Remember: never skip step 3, it is the key mistake!";
        assert_eq!(score(text), score(text));
    }
}
