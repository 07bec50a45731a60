// SYNOID Ranker Request Builder
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use crate::highlights::types::{is_distinct, rank_by_score};
use crate::highlights::{Candidate, ClipBounds, DISTINCT_GAP_SECS};
use serde::{Deserialize, Serialize};

/// Most candidates ever shown to the ranker.
pub const PROMPT_CANDIDATE_LIMIT: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptCandidate {
    pub idx: usize,
    pub start_sec: f64,
    pub end_sec: f64,
    pub text: String,
    pub info: f64,
    pub hook: f64,
}

/// Serializable request for the content ranker. Candidate `idx` values index
/// into the pool the request was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub max_clips: usize,
    pub min_sec: f64,
    pub max_sec: f64,
    pub candidates: Vec<PromptCandidate>,
}

impl RankRequest {
    pub fn new(pool: &[Candidate], max_clips: usize, bounds: ClipBounds) -> Self {
        let candidates = pool
            .iter()
            .enumerate()
            .map(|(idx, c)| PromptCandidate {
                idx,
                start_sec: c.start,
                end_sec: c.end,
                text: c.text.clone(),
                info: c.info_score,
                hook: c.hook_score,
            })
            .collect();
        Self {
            max_clips,
            min_sec: bounds.min_secs,
            max_sec: bounds.max_secs,
            candidates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Natural-language instructions followed by the request JSON.
    pub fn to_prompt(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!(
            "Select the best highlight clips from the candidate list. \
             Return strictly valid JSON (no markdown, no code fences) matching the provided schema. \
             Prefer clips that are both informative and hooky. \
             Clips must be distinct scenes with no overlaps/intersections and can be anywhere from 0 to maxClips total. \
             Each clip duration must be between minSec and maxSec. \
             Clips must start cleanly and end on a complete thought, ideally right after a payoff/peak or hook explanation.\
             \n\nCandidates JSON:\n{}",
            json
        ))
    }
}

/// Highest-scoring mutually distinct candidates, topped up in chronological
/// order when short, returned sorted by start time.
pub fn select_prompt_candidates(candidates: &[Candidate], limit: usize) -> Vec<Candidate> {
    if candidates.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut out: Vec<Candidate> = Vec::with_capacity(limit.min(candidates.len()));
    let ranked = rank_by_score(candidates);
    for c in ranked.into_iter().chain(candidates.iter()) {
        if out.len() >= limit {
            break;
        }
        let taken = out.iter().map(|o| (o.start, o.end));
        if is_distinct(taken, c.start, c.end, DISTINCT_GAP_SECS) {
            out.push(c.clone());
        }
    }

    out.sort_by(|a, b| a.start.total_cmp(&b.start));
    out
}
