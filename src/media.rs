// SYNOID Media Tool - FFmpeg / FFprobe wrappers
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Every child is spawned with kill_on_drop so an elapsed run timeout also
// stops the encoder.

use crate::error::{HighlightError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct MediaTool {
    ffmpeg: String,
    ffprobe: String,
}

impl Default for MediaTool {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl MediaTool {
    /// Blank paths fall back to `ffmpeg` / `ffprobe` on PATH.
    pub fn new(ffmpeg: &str, ffprobe: &str) -> Self {
        let or_default = |path: &str, default: &str| match path.trim() {
            "" => default.to_string(),
            p => p.to_string(),
        };
        Self {
            ffmpeg: or_default(ffmpeg, "ffmpeg"),
            ffprobe: or_default(ffprobe, "ffprobe"),
        }
    }

    /// Container duration in seconds.
    pub async fn probe_duration(&self, input: &Path) -> Result<f64> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(input.as_os_str().to_owned());

        let output = run_tool(&self.ffprobe, args, "ffprobe duration").await?;
        let raw = String::from_utf8_lossy(&output.stdout);
        let raw = raw.trim();
        let secs: f64 = raw
            .parse()
            .map_err(|_| HighlightError::Media(format!("unparseable duration {:?}", raw)))?;
        debug!("[MEDIA] {:?} is {:.3}s long", input, secs);
        Ok(secs)
    }

    /// Mono 16 kHz WAV, the input format transcribers expect.
    pub async fn extract_audio(&self, input: &Path, output: &Path) -> Result<()> {
        info!("[MEDIA] Extracting audio {:?} -> {:?}", input, output);
        run_tool(&self.ffmpeg, extract_audio_args(input, output), "ffmpeg extract audio").await?;
        Ok(())
    }

    /// Re-encode `[start, end]` of `input`, optionally burning in an ASS file.
    pub async fn render_clip(
        &self,
        input: &Path,
        start: f64,
        end: f64,
        output: &Path,
        subtitles: Option<&Path>,
    ) -> Result<()> {
        info!(
            "[MEDIA] Rendering {}-{} -> {:?}",
            format_seconds(start),
            format_seconds(end),
            output
        );
        let args = render_args(input, start, end, output, subtitles);
        run_tool(&self.ffmpeg, args, "ffmpeg render clip").await?;
        Ok(())
    }
}

async fn run_tool(program: &str, args: Vec<OsString>, what: &str) -> Result<Output> {
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| HighlightError::Media(format!("failed to launch {}: {}", program, e)))?;

    if !output.status.success() {
        return Err(HighlightError::Media(format!(
            "{} failed: {}",
            what,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output)
}

pub fn extract_audio_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.as_os_str().to_owned()];
    args.extend(
        ["-vn", "-ac", "1", "-ar", "16000", "-f", "wav"]
            .into_iter()
            .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

/// Seek before the input, then re-encode with x264 and AAC.
pub fn render_args(
    input: &Path,
    start: f64,
    end: f64,
    output: &Path,
    subtitles: Option<&Path>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-ss".into(),
        format_seconds(start).into(),
        "-to".into(),
        format_seconds(end).into(),
        "-i".into(),
        input.as_os_str().to_owned(),
    ];
    if let Some(ass) = subtitles {
        args.push("-vf".into());
        args.push(format!("subtitles={}", escape_filter_path(ass)).into());
    }
    args.extend(
        [
            "-c:v", "libx264", "-preset", "veryfast", "-crf", "18", "-c:a", "aac", "-b:a",
            "192k",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

/// Escape a path for use inside an ffmpeg filter argument.
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
}

pub fn format_seconds(secs: f64) -> String {
    format!("{:.3}", secs)
}
