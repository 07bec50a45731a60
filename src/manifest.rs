// SYNOID Highlight Manifest
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// The record of a run: which clips were chosen, why, and where they were
// rendered. Written as pretty JSON next to the clips.

use crate::error::{HighlightError, Result};
use crate::highlights::{score, ClipSpec, TranscriptTiming};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestClip {
    /// 1-based, zero-padded (`001`).
    pub id: String,
    pub start_sec: f64,
    pub end_sec: f64,
    pub title: String,
    pub caption: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reason: String,
    /// Spoken words inside the clip.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub info_score: f64,
    #[serde(default)]
    pub hook_score: f64,
    /// Rendered clip path, relative to the run directory. Empty when the
    /// clip was planned but not rendered.
    #[serde(default)]
    pub file: String,
    /// Burned-in ASS file, relative to the run directory.
    #[serde(default)]
    pub subtitles: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub input: String,
    pub clips: Vec<ManifestClip>,
}

pub fn clip_id(index: usize) -> String {
    format!("{:03}", index + 1)
}

impl Manifest {
    /// Clip text and scores are taken from the word timings.
    pub fn from_clips(input: &str, clips: &[ClipSpec], timing: &TranscriptTiming) -> Self {
        let clips = clips
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let text = timing.text_between(c.start, c.end);
                let scores = score(&text);
                ManifestClip {
                    id: clip_id(i),
                    start_sec: c.start,
                    end_sec: c.end,
                    title: c.title.clone(),
                    caption: c.caption.clone(),
                    tags: c.tags.clone(),
                    reason: c.reason.clone(),
                    text,
                    info_score: scores.info,
                    hook_score: scores.hook,
                    file: String::new(),
                    subtitles: String::new(),
                }
            })
            .collect();
        Self {
            input: input.to_string(),
            clips,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Write `manifest.json` into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| HighlightError::io("creating run directory", e))?;
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HighlightError::json("serializing manifest", e))?;
        fs::write(&path, json).map_err(|e| HighlightError::io("writing manifest", e))?;

        info!("[MANIFEST] Saved {} clips to {}", self.clips.len(), path.display());
        Ok(path)
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let json =
            fs::read_to_string(&path).map_err(|e| HighlightError::io("reading manifest", e))?;
        serde_json::from_str(&json).map_err(|e| HighlightError::json("parsing manifest", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Segment, Transcript, Word};
    use tempfile::tempdir;

    fn no_words() -> TranscriptTiming {
        TranscriptTiming::collect(&Transcript::default())
    }

    fn spec(start: f64, end: f64, title: &str) -> ClipSpec {
        ClipSpec {
            start,
            end,
            title: title.to_string(),
            caption: format!("{} caption", title),
            tags: vec!["tag".into()],
            reason: "fallback".into(),
        }
    }

    #[test]
    fn test_ids_are_padded() {
        assert_eq!(clip_id(0), "001");
        assert_eq!(clip_id(41), "042");
        assert_eq!(clip_id(999), "1000");
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = tempdir().unwrap();
        let run_dir = dir.path().join("talk-run");
        let mut manifest =
            Manifest::from_clips(
                "talk.mp4",
                &[spec(0.0, 30.0, "One"), spec(40.0, 70.0, "Two")],
                &no_words(),
            );
        manifest.clips[1].file = "clips/002.mp4".into();
        manifest.clips[1].subtitles = "subtitles/002.ass".into();

        let path = manifest.save(&run_dir).unwrap();
        assert!(path.ends_with(MANIFEST_FILE));

        let loaded = Manifest::load(&run_dir).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.clips[0].id, "001");
        assert_eq!(loaded.clips[1].start_sec, 40.0);
    }

    #[test]
    fn test_empty_manifest_is_valid() {
        let dir = tempdir().unwrap();
        let manifest = Manifest::from_clips("short.mp4", &[], &no_words());
        assert!(manifest.is_empty());
        manifest.save(dir.path()).unwrap();

        let raw = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["clips"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_clip_text_and_scores() {
        let words: Vec<Word> = ["Here's", "why", "latency", "dropped", "40%", "today."]
            .iter()
            .enumerate()
            .map(|(i, w)| Word {
                start: 10.0 + i as f64,
                end: 10.8 + i as f64,
                word: w.to_string(),
            })
            .collect();
        let transcript = Transcript::new(vec![Segment {
            start: 10.0,
            end: 15.8,
            text: String::new(),
            words,
        }]);
        let timing = TranscriptTiming::collect(&transcript);

        let manifest = Manifest::from_clips("talk.mp4", &[spec(11.0, 14.0, "Mid")], &timing);
        let clip = &manifest.clips[0];
        assert_eq!(clip.text, "why latency dropped");
        let expected = score("why latency dropped");
        assert_eq!(clip.info_score, expected.info);
        assert_eq!(clip.hook_score, expected.hook);
        assert!(clip.subtitles.is_empty());
    }

    #[test]
    fn test_older_manifests_still_load() {
        let raw = r#"{"input":"a.mp4","clips":[{"id":"001","start_sec":0.0,"end_sec":20.0,"title":"t","caption":"c"}]}"#;
        let manifest: Manifest = serde_json::from_str(raw).unwrap();
        assert!(manifest.clips[0].text.is_empty());
        assert_eq!(manifest.clips[0].hook_score, 0.0);
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Manifest::load(dir.path()),
            Err(HighlightError::Io { .. })
        ));
    }
}
