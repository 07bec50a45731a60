// SYNOID Highlights Pipeline
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Stage sequencing around the pure core: load transcript, build candidates,
// consult the ranker, reconcile, write the manifest and optionally render.

use crate::config::HighlightConfig;
use crate::error::{HighlightError, Result};
use crate::highlights::{
    build_candidates, BoundaryRefiner, ClipSpec, Reconciler, TranscriptTiming,
};
use crate::manifest::{clip_id, Manifest};
use crate::media::MediaTool;
use crate::ranker::{select_prompt_candidates, ContentRanker, RankRequest, PROMPT_CANDIDATE_LIMIT};
use crate::subtitles::render_clip_ass;
use crate::transcript::Transcript;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
}

/// Choose the final clips for a transcript. Never fails: a broken ranker
/// degrades to deterministic selection and an empty list is a valid answer.
pub async fn plan_highlights<R: ContentRanker>(
    transcript: &Transcript,
    config: &HighlightConfig,
    ranker: &R,
) -> Vec<ClipSpec> {
    plan_with_refiner(transcript, config, ranker, BoundaryRefiner::default()).await
}

/// [`plan_highlights`] with custom sentence-end cues for boundary snapping.
pub async fn plan_with_refiner<R: ContentRanker>(
    transcript: &Transcript,
    config: &HighlightConfig,
    ranker: &R,
    refiner: BoundaryRefiner,
) -> Vec<ClipSpec> {
    let bounds = config.bounds();

    info!("[PIPELINE] Stage 1/3: generating candidate windows");
    let started = Instant::now();
    let timing = TranscriptTiming::collect(transcript);
    let candidates = build_candidates(transcript, bounds);
    let pool = select_prompt_candidates(&candidates, PROMPT_CANDIDATE_LIMIT);
    info!(
        "[PIPELINE] Stage 1/3 done in {} ({} candidates, {} offered to ranker)",
        short_duration(started.elapsed()),
        candidates.len(),
        pool.len()
    );

    info!("[PIPELINE] Stage 2/3: ranking with {}", ranker.name());
    let started = Instant::now();
    let request = RankRequest::new(&pool, config.clips, bounds);
    let proposal = match ranker.rank(&request).await {
        Ok(proposal) => Some(proposal),
        Err(e) => {
            warn!("[PIPELINE] Ranker failed, using deterministic selection: {}", e);
            None
        }
    };
    info!(
        "[PIPELINE] Stage 2/3 done in {} ({} proposed)",
        short_duration(started.elapsed()),
        proposal.as_ref().map_or(0, |p| p.clips.len())
    );

    info!("[PIPELINE] Stage 3/3: reconciling selection");
    let started = Instant::now();
    let clips = Reconciler::new(&pool, bounds, &timing)
        .with_refiner(refiner)
        .reconcile(proposal.as_ref(), config.clips);
    info!(
        "[PIPELINE] Stage 3/3 done in {} ({} selected)",
        short_duration(started.elapsed()),
        clips.len()
    );

    if clips.is_empty() {
        info!(
            "[PIPELINE] No highlights found ({} to {}, distinct non-overlapping windows)",
            format_timestamp(config.min_secs),
            format_timestamp(config.max_secs)
        );
    }
    clips
}

/// Full run under the configured wall-clock limit.
pub async fn run<R: ContentRanker>(
    transcript_path: &Path,
    input_video: Option<&Path>,
    out_dir: &Path,
    config: &HighlightConfig,
    ranker: &R,
    render: bool,
) -> Result<RunOutcome> {
    config.validate()?;
    let limit = Duration::from_secs(config.timeout_secs);
    tokio::time::timeout(
        limit,
        run_stages(transcript_path, input_video, out_dir, config, ranker, render),
    )
    .await
    .map_err(|_| HighlightError::Timeout(format!("run exceeded {}", short_duration(limit))))?
}

async fn run_stages<R: ContentRanker>(
    transcript_path: &Path,
    input_video: Option<&Path>,
    out_dir: &Path,
    config: &HighlightConfig,
    ranker: &R,
    render: bool,
) -> Result<RunOutcome> {
    let started = Instant::now();
    info!(
        "[PIPELINE] Requested {} clips ({}-{}s each)",
        config.clips, config.min_secs, config.max_secs
    );

    let transcript = Transcript::load(transcript_path)?;
    let clips = plan_highlights(&transcript, config, ranker).await;

    let source = input_video.unwrap_or(transcript_path);
    let run_dir = build_run_dir(out_dir, source, Utc::now());
    info!("[PIPELINE] Output run dir: {}", run_dir.display());

    let timing = TranscriptTiming::collect(&transcript);
    let mut manifest = Manifest::from_clips(&source.to_string_lossy(), &clips, &timing);

    match (render, input_video) {
        (true, Some(video)) => {
            let subtitles = config.burn_subtitles.then_some((&transcript, &timing));
            render_all(config, video, &run_dir, &clips, subtitles, &mut manifest).await?
        }
        (true, None) => warn!("[PIPELINE] Rendering requested without an input video, skipping"),
        _ => {}
    }

    let manifest_path = manifest.save(&run_dir)?;
    info!(
        "[PIPELINE] Run completed in {} ({} clips)",
        short_duration(started.elapsed()),
        manifest.clips.len()
    );
    Ok(RunOutcome {
        run_dir,
        manifest_path,
        manifest,
    })
}

async fn render_all(
    config: &HighlightConfig,
    video: &Path,
    run_dir: &Path,
    clips: &[ClipSpec],
    subtitles: Option<(&Transcript, &TranscriptTiming)>,
    manifest: &mut Manifest,
) -> Result<()> {
    let tool = MediaTool::new(&config.ffmpeg_path, &config.ffprobe_path);
    let clips_dir = run_dir.join("clips");
    tokio::fs::create_dir_all(&clips_dir)
        .await
        .map_err(|e| HighlightError::io("creating clips directory", e))?;
    if subtitles.is_some() {
        tokio::fs::create_dir_all(run_dir.join("subtitles"))
            .await
            .map_err(|e| HighlightError::io("creating subtitles directory", e))?;
    }

    let duration = tool.probe_duration(video).await?;
    info!("[PIPELINE] Rendering {} clips from {:.1}s of video", clips.len(), duration);

    for (i, (clip, entry)) in clips.iter().zip(manifest.clips.iter_mut()).enumerate() {
        let id = clip_id(i);
        if clip.end > duration {
            warn!(
                "[PIPELINE] Clip {} ends at {} past the video end {}",
                id,
                format_timestamp(clip.end),
                format_timestamp(duration)
            );
        }
        info!(
            "[PIPELINE] Rendering clip {}/{} ({}) [{} -> {}]",
            i + 1,
            clips.len(),
            id,
            format_timestamp(clip.start),
            format_timestamp(clip.end)
        );
        let ass = match subtitles {
            Some((transcript, timing)) => {
                let relative = format!("subtitles/{}.ass", id);
                let path = run_dir.join(&relative);
                let ass = render_clip_ass(transcript, timing, clip.start, clip.end);
                write_subtitles(&path, &ass).await?;
                entry.subtitles = relative;
                Some(path)
            }
            None => None,
        };

        let output = clips_dir.join(format!("{}.mp4", id));
        tool.render_clip(video, clip.start, clip.end, &output, ass.as_deref()).await?;
        entry.file = format!("clips/{}.mp4", id);
    }
    Ok(())
}

async fn write_subtitles(path: &Path, ass: &str) -> Result<()> {
    tokio::fs::write(path, ass)
        .await
        .map_err(|e| HighlightError::io("writing subtitles", e))
}

/// `<out_root>/<stem>-<YYYYmmdd-HHMMSSZ>-<6 hex>`.
pub fn build_run_dir(out_root: &Path, input: &Path, now: DateTime<Utc>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = normalize_path_segment(&stem);
    if name.is_empty() {
        name = "input".to_string();
    }

    let seed = format!(
        "{}|{}",
        input.display(),
        now.timestamp_nanos_opt().unwrap_or_default()
    );
    let digest = format!("{:x}", Sha256::digest(seed.as_bytes()));
    out_root.join(format!(
        "{}-{}-{}",
        name,
        now.format("%Y%m%d-%H%M%SZ"),
        &digest[..6]
    ))
}

/// Lowercase alphanumerics; every other run of characters becomes one `-`.
pub fn normalize_path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_dash = false;
    for c in raw.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            out.push(c);
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

fn short_duration(d: Duration) -> String {
    format!("{:.1}s", d.as_secs_f64())
}

/// `MM:SS`, or `H:MM:SS` past the hour.
pub fn format_timestamp(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}
