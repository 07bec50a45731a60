// SYNOID Chat Ranker Bridge
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use super::request::RankRequest;
use super::response::{message_content_to_string, parse_proposal, redact_secrets, truncate};
use super::{ContentRanker, RankerError};
use crate::config::RankerConfig;
use crate::highlights::RankProposal;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
const ERROR_BODY_LIMIT: usize = 400;
const SCHEMA_NAME: &str = "highlight_selection";

/// OpenAI-compatible chat-completions client that asks a model to pick clips.
#[derive(Debug, Clone)]
pub struct ChatRanker {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ChatRanker {
    pub fn new(config: &RankerConfig) -> Result<Self, RankerError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RankerError::Http(e.to_string()))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/v1/chat/completions", self.base_url)
    }

    pub fn payload(&self, request: &RankRequest) -> Result<Value, RankerError> {
        let prompt = request
            .to_prompt()
            .map_err(|e| RankerError::Parse(format!("encode request: {}", e)))?;

        Ok(json!({
            "model": self.model,
            "stream": false,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "schema": proposal_schema()
                }
            }
        }))
    }
}

fn proposal_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "clips": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "idx": { "type": "integer" },
                        "start_sec": { "type": "number" },
                        "end_sec": { "type": "number" },
                        "title": { "type": "string" },
                        "caption": { "type": "string" },
                        "tags": { "type": "array", "items": { "type": "string" } },
                        "reason": { "type": "string" }
                    },
                    "required": ["idx", "start_sec", "end_sec", "title", "caption", "tags", "reason"]
                }
            }
        },
        "required": ["clips"]
    })
}

impl ContentRanker for ChatRanker {
    fn name(&self) -> &str {
        &self.model
    }

    async fn rank(&self, request: &RankRequest) -> Result<RankProposal, RankerError> {
        if request.is_empty() {
            return Ok(RankProposal::default());
        }
        info!(
            "[RANKER] Asking {} to pick {} clips from {} candidates",
            self.model,
            request.max_clips,
            request.candidates.len()
        );

        let payload = self.payload(request)?;
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RankerError::Http(format!(
                        "timeout after {}s (model={})",
                        REQUEST_TIMEOUT.as_secs(),
                        self.model
                    ))
                } else {
                    RankerError::Http(redact_secrets(&e.to_string(), &self.api_key))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RankerError::Status {
                status: status.as_u16(),
                body: truncate(&redact_secrets(&body, &self.api_key), ERROR_BODY_LIMIT),
            });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| RankerError::Parse(e.to_string()))?;
        let content = message_content_to_string(&json["choices"][0]["message"]["content"])?;
        debug!("[RANKER] Received {} chars of content", content.len());

        parse_proposal(&content)
    }
}
