// SYNOID Content Ranker
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// The external collaborator that picks clips from the candidate list. Its
// answer is advisory: the reconciler validates every proposal and falls back
// to deterministic selection when the ranker is absent or unhelpful.

pub mod chat;
pub mod request;
pub mod response;

pub use chat::ChatRanker;
pub use request::{select_prompt_candidates, PromptCandidate, RankRequest, PROMPT_CANDIDATE_LIMIT};
pub use response::{extract_json_object, message_content_to_string, parse_proposal};

use crate::config::RankerConfig;
use crate::highlights::RankProposal;
use std::future::Future;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RankerError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("ranker returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("ranker returned empty content")]
    EmptyContent,

    #[error("could not locate JSON object in: {0:?}")]
    NoJson(String),

    #[error("could not parse proposal: {0}")]
    Parse(String),
}

pub trait ContentRanker {
    fn name(&self) -> &str;

    fn rank(
        &self,
        request: &RankRequest,
    ) -> impl Future<Output = Result<RankProposal, RankerError>> + Send;
}

/// Ranker that never proposes anything, leaving selection to the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRanker;

impl ContentRanker for OfflineRanker {
    fn name(&self) -> &str {
        "offline"
    }

    async fn rank(&self, _request: &RankRequest) -> Result<RankProposal, RankerError> {
        Ok(RankProposal::default())
    }
}

/// Ranker chosen at startup from configuration.
#[derive(Debug, Clone)]
pub enum RankerBackend {
    Chat(ChatRanker),
    Offline(OfflineRanker),
}

impl RankerBackend {
    /// Chat ranker when an API key is configured and `offline` is not set.
    pub fn from_config(config: &RankerConfig, offline: bool) -> Result<Self, RankerError> {
        if offline || config.api_key.trim().is_empty() {
            info!("[RANKER] No ranker configured, using deterministic selection");
            return Ok(Self::Offline(OfflineRanker));
        }
        Ok(Self::Chat(ChatRanker::new(config)?))
    }
}

impl ContentRanker for RankerBackend {
    fn name(&self) -> &str {
        match self {
            Self::Chat(r) => r.name(),
            Self::Offline(r) => r.name(),
        }
    }

    async fn rank(&self, request: &RankRequest) -> Result<RankProposal, RankerError> {
        match self {
            Self::Chat(r) => r.rank(request).await,
            Self::Offline(r) => r.rank(request).await,
        }
    }
}
