// SYNOID Highlights Data Model
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::{Deserialize, Serialize};

/// Guard band (seconds) that accepted clips must keep from each other.
pub const DISTINCT_GAP_SECS: f64 = 2.0;

/// Legal clip duration range, passed explicitly into every stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipBounds {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl ClipBounds {
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Non-positive or inverted bounds make every stage produce nothing.
    pub fn is_valid(&self) -> bool {
        self.min_secs > 0.0 && self.max_secs > 0.0 && self.max_secs >= self.min_secs
    }

    pub fn contains(&self, duration: f64) -> bool {
        duration >= self.min_secs && duration <= self.max_secs
    }
}

/// A scored window of transcript text. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub info_score: f64,
    pub hook_score: f64,
}

impl Candidate {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn total_score(&self) -> f64 {
        self.info_score + self.hook_score
    }
}

/// A finalized highlight clip handed to the renderer and manifest writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSpec {
    pub start: f64,
    pub end: f64,
    pub title: String,
    pub caption: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reason: String,
}

impl ClipSpec {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// True when `[start, end]` stays outside the guard band of every existing span.
pub fn is_distinct<I>(existing: I, start: f64, end: f64, gap: f64) -> bool
where
    I: IntoIterator<Item = (f64, f64)>,
{
    existing
        .into_iter()
        .all(|(s, e)| !(start < e + gap && end > s - gap))
}

/// Rank by `info + hook` descending; ties go to the earlier start.
pub(crate) fn rank_by_score(candidates: &[Candidate]) -> Vec<&Candidate> {
    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_score()
            .total_cmp(&a.total_score())
            .then_with(|| a.start.total_cmp(&b.start))
    });
    ranked
}
