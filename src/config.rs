// SYNOID Highlights Configuration
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Layered settings: defaults, then an optional highlights.json, then the
// environment (.env is loaded by the binary), then CLI flags.

use crate::error::{HighlightError, Result};
use crate::highlights::ClipBounds;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

pub const CONFIG_FILE: &str = "highlights.json";
pub const DEFAULT_MODEL: &str = "z-ai/glm-4.5-air:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai";
pub const DEFAULT_ALLOWED_HOSTS: [&str; 2] = ["openrouter.ai", "api.openrouter.ai"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub allowed_hosts: Vec<String>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            allowed_hosts: DEFAULT_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl RankerConfig {
    /// Check that the base URL is an https endpoint on an allowed host.
    pub fn validate(&self) -> Result<()> {
        let base = match self.base_url.trim().trim_end_matches('/') {
            "" => DEFAULT_BASE_URL,
            b => b,
        };
        let url = Url::parse(base)
            .map_err(|e| HighlightError::config(format!("invalid base URL {:?}: {}", base, e)))?;

        let host = match url.host_str() {
            Some(h) if !h.is_empty() && !url.cannot_be_a_base() => h.to_lowercase(),
            _ => {
                return Err(HighlightError::config(format!(
                    "invalid base URL {:?}: absolute URL with host is required",
                    base
                )))
            }
        };
        if !url.username().is_empty() || url.password().is_some() {
            return Err(HighlightError::config(format!(
                "invalid base URL {:?}: userinfo is not allowed",
                base
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(HighlightError::config(format!(
                "invalid base URL {:?}: query and fragment are not allowed",
                base
            )));
        }
        if url.scheme() != "https" {
            return Err(HighlightError::config(format!(
                "invalid base URL {:?}: https is required",
                base
            )));
        }
        if !normalize_allowed_hosts(&self.allowed_hosts).contains(&host) {
            return Err(HighlightError::config(format!(
                "invalid base URL {:?}: host {:?} is not in the allowed hosts",
                base, host
            )));
        }
        Ok(())
    }
}

/// Lowercased bare host names; scheme, port and slashes removed. An empty
/// result means the defaults.
pub fn normalize_allowed_hosts(hosts: &[String]) -> BTreeSet<String> {
    let out: BTreeSet<String> = hosts
        .iter()
        .filter_map(|h| {
            let v = h.trim().to_lowercase();
            let v = v
                .strip_prefix("https://")
                .or_else(|| v.strip_prefix("http://"))
                .unwrap_or(&v)
                .trim_matches('/');
            let v = v.split(':').next().unwrap_or_default();
            (!v.is_empty()).then(|| v.to_string())
        })
        .collect();

    if out.is_empty() {
        DEFAULT_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect()
    } else {
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub clips: usize,
    pub min_secs: f64,
    pub max_secs: f64,
    /// Wall-clock limit for a whole run.
    pub timeout_secs: u64,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Burn karaoke subtitles into rendered clips.
    pub burn_subtitles: bool,
    pub ranker: RankerConfig,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            clips: 3,
            min_secs: 20.0,
            max_secs: 60.0,
            timeout_secs: 3 * 60 * 60,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            burn_subtitles: false,
            ranker: RankerConfig::default(),
        }
    }
}

impl HighlightConfig {
    /// Load from `path` if it exists and parses, otherwise defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!("[CONFIG] Loaded settings from {}", path.display());
                    return config;
                }
                Err(e) => warn!("[CONFIG] Ignoring {}: {}", path.display(), e),
            },
            Err(_) => info!("[CONFIG] Using default settings"),
        }
        Self::default()
    }

    /// Like [`load`](Self::load) but a present, unreadable file is an error.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| HighlightError::io("reading config", e))?;
        let config =
            serde_json::from_str(&content).map_err(|e| HighlightError::json("parsing config", e))?;
        info!("[CONFIG] Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay settings from an environment lookup. Blank values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("OPENROUTER_API_KEY") {
            self.ranker.api_key = v;
        }
        if let Some(v) = get("OPENROUTER_MODEL") {
            self.ranker.model = v;
        }
        if let Some(v) = get("OPENROUTER_BASE_URL") {
            self.ranker.base_url = v;
        }
        if let Some(v) = get("OPENROUTER_ALLOWED_HOSTS") {
            let hosts: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect();
            if !hosts.is_empty() {
                self.ranker.allowed_hosts = hosts;
            }
        }
        if let Some(v) = get("HIGHLIGHTS_FFMPEG") {
            self.ffmpeg_path = v;
        }
        if let Some(v) = get("HIGHLIGHTS_FFPROBE") {
            self.ffprobe_path = v;
        }
    }

    pub fn bounds(&self) -> ClipBounds {
        ClipBounds::new(self.min_secs, self.max_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clips == 0 {
            return Err(HighlightError::config("clips must be > 0"));
        }
        if !(self.max_secs > 0.0) {
            return Err(HighlightError::config("max clip must be > 0"));
        }
        if !(self.min_secs > 0.0) {
            return Err(HighlightError::config("min clip must be > 0"));
        }
        if self.min_secs > self.max_secs {
            return Err(HighlightError::config("min clip must be <= max clip"));
        }
        if self.timeout_secs == 0 {
            return Err(HighlightError::config("timeout must be > 0"));
        }
        self.ranker.validate()
    }
}
