// SYNOID Highlights Entry Point
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use synoid_highlights::config::CONFIG_FILE;
use synoid_highlights::highlights::build_candidates;
use synoid_highlights::media::MediaTool;
use synoid_highlights::pipeline;
use synoid_highlights::ranker::{select_prompt_candidates, RankerBackend};
use synoid_highlights::{HighlightConfig, Transcript};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "synoid-highlights")]
#[command(about = "SYNOID Highlight Finder", long_about = None)]
struct Cli {
    /// Settings file. Must exist and parse when given; otherwise
    /// highlights.json is used if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy, Default)]
struct Bounds {
    /// Minimum clip length in seconds
    #[arg(long)]
    min: Option<f64>,

    /// Maximum clip length in seconds
    #[arg(long)]
    max: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the scored candidate windows as JSON
    Candidates {
        /// Transcript JSON produced by the transcriber
        #[arg(short, long)]
        transcript: PathBuf,

        #[command(flatten)]
        bounds: Bounds,

        /// Only print the top distinct candidates, as offered to the ranker
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the final clip selection as JSON
    Plan {
        #[arg(short, long)]
        transcript: PathBuf,

        /// Number of clips to select
        #[arg(short, long)]
        clips: Option<usize>,

        #[command(flatten)]
        bounds: Bounds,

        /// Skip the ranker and use deterministic selection
        #[arg(long)]
        offline: bool,
    },

    /// Plan, write the manifest and optionally render the clips
    Run {
        #[arg(short, long)]
        transcript: PathBuf,

        /// Source video to cut clips from
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Root directory for run outputs
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        #[arg(short, long)]
        clips: Option<usize>,

        #[command(flatten)]
        bounds: Bounds,

        #[arg(long)]
        offline: bool,

        /// Render clips with ffmpeg (requires --input)
        #[arg(long)]
        render: bool,

        /// Burn karaoke subtitles into rendered clips
        #[arg(long)]
        burn_subtitles: bool,
    },

    /// Extract mono 16 kHz WAV audio for transcription
    ExtractAudio {
        /// Source video
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn load_config(
    path: Option<&Path>,
    clips: Option<usize>,
    bounds: Bounds,
) -> anyhow::Result<HighlightConfig> {
    let mut config = match path {
        Some(path) => HighlightConfig::load_strict(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HighlightConfig::load(Path::new(CONFIG_FILE)),
    };
    config.apply_env();
    if let Some(clips) = clips {
        config.clips = clips;
    }
    if let Some(min) = bounds.min {
        config.min_secs = min;
    }
    if let Some(max) = bounds.max {
        config.max_secs = max;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Candidates {
            transcript,
            bounds,
            limit,
        } => {
            let config = load_config(config_path, None, bounds)?;
            let transcript = Transcript::load(&transcript).context("loading transcript")?;
            let mut candidates = build_candidates(&transcript, config.bounds());
            if let Some(limit) = limit {
                candidates = select_prompt_candidates(&candidates, limit);
            }
            info!("[CLI] {} candidate windows", candidates.len());
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }

        Commands::Plan {
            transcript,
            clips,
            bounds,
            offline,
        } => {
            let config = load_config(config_path, clips, bounds)?;
            config.validate().context("invalid configuration")?;
            let ranker = RankerBackend::from_config(&config.ranker, offline)
                .context("initializing ranker")?;
            let transcript = Transcript::load(&transcript).context("loading transcript")?;

            let plan = pipeline::plan_highlights(&transcript, &config, &ranker).await;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }

        Commands::Run {
            transcript,
            input,
            out,
            clips,
            bounds,
            offline,
            render,
            burn_subtitles,
        } => {
            let mut config = load_config(config_path, clips, bounds)?;
            config.burn_subtitles |= burn_subtitles;
            let ranker = RankerBackend::from_config(&config.ranker, offline)
                .context("initializing ranker")?;

            let outcome = pipeline::run(
                &transcript,
                input.as_deref(),
                &out,
                &config,
                &ranker,
                render,
            )
            .await
            .context("highlight run failed")?;

            info!(
                "[CLI] Manifest written ({} clips): {}",
                outcome.manifest.clips.len(),
                outcome.manifest_path.display()
            );
            println!("{}", outcome.manifest_path.display());
        }

        Commands::ExtractAudio { input, output } => {
            let config = load_config(config_path, None, Bounds::default())?;
            MediaTool::new(&config.ffmpeg_path, &config.ffprobe_path)
                .extract_audio(&input, &output)
                .await
                .context("extracting audio")?;
            println!("{}", output.display());
        }
    }

    Ok(())
}
