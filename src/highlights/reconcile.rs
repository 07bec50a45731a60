// SYNOID Selection Reconciler
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Turns a ranker's proposal into a final, non-overlapping clip list. Anything
// the proposal leaves unusable is covered by deterministic selection over the
// candidate pool.

use super::boundary::BoundaryRefiner;
use super::timing::TranscriptTiming;
use super::types::{is_distinct, rank_by_score, Candidate, ClipBounds, ClipSpec, DISTINCT_GAP_SECS};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_TITLE: &str = "Highlight";
/// Reason tag for clips chosen when the proposal yielded nothing.
pub const FALLBACK_REASON: &str = "fallback";
/// Reason tag for clips that top up a short proposal.
pub const PAD_REASON: &str = "pad";

/// One clip as proposed by the content ranker. Every field is optional so
/// partially filled answers still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposedClip {
    #[serde(default)]
    pub idx: Option<i64>,
    #[serde(default)]
    pub start_sec: Option<f64>,
    #[serde(default)]
    pub end_sec: Option<f64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankProposal {
    #[serde(default)]
    pub clips: Vec<ProposedClip>,
}

pub struct Reconciler<'a> {
    candidates: &'a [Candidate],
    bounds: ClipBounds,
    timing: &'a TranscriptTiming,
    refiner: BoundaryRefiner,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        candidates: &'a [Candidate],
        bounds: ClipBounds,
        timing: &'a TranscriptTiming,
    ) -> Self {
        Self {
            candidates,
            bounds,
            timing,
            refiner: BoundaryRefiner::default(),
        }
    }

    pub fn with_refiner(mut self, refiner: BoundaryRefiner) -> Self {
        self.refiner = refiner;
        self
    }

    pub fn reconcile(&self, proposal: Option<&RankProposal>, target: usize) -> Vec<ClipSpec> {
        if target == 0 || !self.bounds.is_valid() {
            return Vec::new();
        }

        let mut accepted: Vec<ClipSpec> = Vec::with_capacity(target);
        if let Some(proposal) = proposal {
            for clip in &proposal.clips {
                if accepted.len() >= target {
                    break;
                }
                let Some((start, end)) = self.normalize_proposed(clip) else {
                    debug!("[RECONCILE] Dropping unusable proposal {:?}", clip.idx);
                    continue;
                };
                if !distinct_from(&accepted, start, end) {
                    debug!("[RECONCILE] Dropping overlapping proposal {:.2}-{:.2}", start, end);
                    continue;
                }
                accepted.push(self.proposed_spec(clip, start, end));
            }
        }

        let reason = if accepted.is_empty() { FALLBACK_REASON } else { PAD_REASON };
        if accepted.len() < target {
            let before = accepted.len();
            self.fill_from_ranked(&mut accepted, target, reason);
            debug!(
                "[RECONCILE] Added {} '{}' clips ({} from proposal)",
                accepted.len() - before,
                reason,
                before
            );
        }

        accepted.truncate(target);
        accepted
    }

    /// Explicit timing first; the referenced candidate's own range second.
    fn normalize_proposed(&self, clip: &ProposedClip) -> Option<(f64, f64)> {
        if let (Some(start), Some(end)) = (clip.start_sec, clip.end_sec) {
            if start.is_finite() && end.is_finite() {
                let normalized = self
                    .refiner
                    .normalize(start.max(0.0), end, self.bounds, self.timing);
                if normalized.is_some() {
                    return normalized;
                }
            }
        }
        let candidate = self.referenced(clip)?;
        self.refiner
            .normalize(candidate.start, candidate.end, self.bounds, self.timing)
    }

    fn referenced(&self, clip: &ProposedClip) -> Option<&'a Candidate> {
        let idx = usize::try_from(clip.idx?).ok()?;
        self.candidates.get(idx)
    }

    fn proposed_spec(&self, clip: &ProposedClip, start: f64, end: f64) -> ClipSpec {
        let title = match clip.title.trim() {
            "" => DEFAULT_TITLE.to_string(),
            t => t.to_string(),
        };
        let caption = match clip.caption.trim() {
            "" => self
                .referenced(clip)
                .map(|c| c.text.trim())
                .filter(|t| !t.is_empty())
                .unwrap_or(&title)
                .to_string(),
            c => c.to_string(),
        };
        ClipSpec {
            start,
            end,
            title,
            caption,
            tags: clip.tags.clone(),
            reason: clip.reason.trim().to_string(),
        }
    }

    fn fill_from_ranked(&self, accepted: &mut Vec<ClipSpec>, target: usize, reason: &str) {
        for candidate in rank_by_score(self.candidates) {
            if accepted.len() >= target {
                break;
            }
            let Some((start, end)) =
                self.refiner
                    .normalize(candidate.start, candidate.end, self.bounds, self.timing)
            else {
                continue;
            };
            if !distinct_from(accepted, start, end) {
                continue;
            }
            let caption = match candidate.text.trim() {
                "" => DEFAULT_TITLE.to_string(),
                t => t.to_string(),
            };
            accepted.push(ClipSpec {
                start,
                end,
                title: DEFAULT_TITLE.to_string(),
                caption,
                tags: Vec::new(),
                reason: reason.to_string(),
            });
        }
    }
}

fn distinct_from(accepted: &[ClipSpec], start: f64, end: f64) -> bool {
    is_distinct(
        accepted.iter().map(|c| (c.start, c.end)),
        start,
        end,
        DISTINCT_GAP_SECS,
    )
}

/// Reconcile with the default English boundary refiner.
pub fn reconcile(
    candidates: &[Candidate],
    proposal: Option<&RankProposal>,
    target: usize,
    bounds: ClipBounds,
    timing: &TranscriptTiming,
) -> Vec<ClipSpec> {
    Reconciler::new(candidates, bounds, timing).reconcile(proposal, target)
}
