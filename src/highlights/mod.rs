// SYNOID Highlights Core
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Pure, synchronous stages: transcript -> candidate windows -> (ranker) ->
// reconciled clip list. Nothing here performs I/O or keeps state between calls.

pub mod boundary;
pub mod candidates;
pub mod lexicon;
pub mod reconcile;
pub mod score;
pub mod timing;
pub mod types;

pub use boundary::{normalize_clip_duration, BoundaryRefiner, SentenceEndWeights};
pub use candidates::build_candidates;
pub use lexicon::BoundaryLexicon;
pub use reconcile::{reconcile, ProposedClip, RankProposal, Reconciler};
pub use score::{score, TextScore};
pub use timing::{TimedWord, TranscriptTiming};
pub use types::{Candidate, ClipBounds, ClipSpec, DISTINCT_GAP_SECS};
