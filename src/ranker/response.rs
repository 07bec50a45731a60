// SYNOID Ranker Response Parsing
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Models wrap JSON in code fences, prepend chatter, or split content into
// parts. These helpers recover the proposal object when one exists.

use super::RankerError;
use crate::highlights::RankProposal;
use serde_json::Value;

/// Flatten a chat message `content` that is either a string or an array of
/// `{type, text}` parts.
pub fn message_content_to_string(content: &Value) -> Result<String, RankerError> {
    match content {
        Value::String(s) => Ok(s.clone()),
        Value::Array(parts) => {
            let joined: String = parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect();
            if joined.trim().is_empty() {
                Err(RankerError::EmptyContent)
            } else {
                Ok(joined)
            }
        }
        Value::Null => Err(RankerError::EmptyContent),
        other => Err(RankerError::Parse(format!(
            "unexpected content type: {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The outermost `{...}` span, after stripping a markdown code fence.
pub fn extract_json_object(content: &str) -> Result<&str, RankerError> {
    let mut text = content.trim();
    if text.is_empty() {
        return Err(RankerError::EmptyContent);
    }

    if text.starts_with("```") {
        if let Some(newline) = text.find('\n') {
            text = &text[newline + 1..];
        }
        if let Some(fence) = text.rfind("```") {
            text = &text[..fence];
        }
        text = text.trim();
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(open), Some(close)) if close > open => Ok(&text[open..=close]),
        _ => Err(RankerError::NoJson(truncate(text, 200))),
    }
}

pub fn parse_proposal(content: &str) -> Result<RankProposal, RankerError> {
    let json = extract_json_object(content)?;
    serde_json::from_str(json).map_err(|e| RankerError::Parse(e.to_string()))
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Scrub the API key, bearer tokens and credential-looking fields.
pub fn redact_secrets(text: &str, api_key: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = text.to_string();
    if !api_key.is_empty() {
        out = out.replace(api_key, "[REDACTED]");
    }
    let out = regex!(r"(?i)\bBearer\s+[A-Za-z0-9._-]+\b").replace_all(&out, "Bearer [REDACTED]");
    let out = regex!(r"(?i)(authorization\s*[:=]\s*)([^\n\r,;]+)").replace_all(&out, "${1}[REDACTED]");
    let out = regex!(r"(?i)(api[_-]?key\s*[:=]\s*)([^\n\r,;]+)").replace_all(&out, "${1}[REDACTED]");
    out.into_owned()
}
