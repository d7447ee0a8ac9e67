#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use emotion_voice_core::clock::SystemClock;
use emotion_voice_core::config::{
    resolve_lang, resolve_optional_string, AppConfig, CanvasSize, Env, FrameInterval, StdEnv,
    DEFAULT_CANVAS_PX, DEFAULT_FRAME_INTERVAL_MS, ENV_EXPORT_DIR,
};
use emotion_voice_core::emotion::{export_result, EmotionAnalysis, ResultRecord};
use emotion_voice_core::render::{lock_surface, shared, Surface};
use emotion_voice_core::session::RecordingSession;
use emotion_voice_core::speech::ScriptedRecognizer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emotion-voice")]
#[command(about = "Headless recording session with the emotion voice waveform")]
struct Args {
    /// How long to keep recording
    #[arg(long, default_value_t = 10)]
    seconds: u64,

    /// Recognition language; falls back to $EMOTION_VOICE_LANG, then ja-JP
    #[arg(long)]
    lang: Option<String>,

    #[arg(long, default_value_t = DEFAULT_CANVAS_PX)]
    width: u32,

    #[arg(long, default_value_t = DEFAULT_CANVAS_PX)]
    height: u32,

    #[arg(long, default_value_t = DEFAULT_FRAME_INTERVAL_MS)]
    frame_interval_ms: u64,

    /// Record without speech-to-text
    #[arg(long)]
    no_speech: bool,

    /// Save the last waveform frame as PNG before stopping
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write the analysis result as JSON into this directory
    /// (falls back to $EMOTION_VOICE_EXPORT_DIR)
    #[arg(long)]
    export_dir: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let seconds = args.seconds;
    let no_speech = args.no_speech;
    let snapshot = args.snapshot.clone();
    let cfg = build_config(args, &StdEnv)?;

    tracing::info!(
        lang = cfg.lang.as_str(),
        width = cfg.canvas.width,
        height = cfg.canvas.height,
        fps = cfg.frame_interval.frames_per_second(),
        "config loaded"
    );

    run_session(cfg, seconds, !no_speech, snapshot).await
}

async fn run_session(
    cfg: AppConfig,
    seconds: u64,
    speech: bool,
    snapshot: Option<PathBuf>,
) -> anyhow::Result<()> {
    let surface = shared(Surface::attached(cfg.canvas).context("failed to create canvas")?);
    let mut session = RecordingSession::new(&cfg, Arc::new(SystemClock), Arc::clone(&surface));
    if speech {
        session = session.with_recognizer(Arc::new(ScriptedRecognizer::demo()));
    }

    session.start()?;
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
        }
    }

    if let Some(path) = &snapshot {
        lock_surface(&surface)
            .save_png(path)
            .with_context(|| format!("failed to save snapshot to {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot saved");
    }

    let frames = session.visualizer().map(|v| v.draws()).unwrap_or(0);
    session.stop()?;

    let transcript = session.transcript();
    println!("Recorded {}s ({} frames)", session.elapsed_secs(), frames);
    println!("{}", transcript.display_text(false));

    if let Some(dir) = &cfg.export_dir {
        let finalized = transcript.finalized().to_owned();
        let record = ResultRecord::new(EmotionAnalysis::sample(), Some(finalized));
        let path = export_result(dir, &record)
            .with_context(|| format!("failed to export result into {}", dir.display()))?;
        println!("Result saved to {}", path.display());
    }

    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    let lang = resolve_lang(args.lang, env)?;
    let canvas = CanvasSize::new(args.width, args.height)?;
    let frame_interval = FrameInterval::new(args.frame_interval_ms)?;
    let export_dir =
        resolve_optional_string(args.export_dir, ENV_EXPORT_DIR, env).map(PathBuf::from);

    Ok(AppConfig {
        lang,
        canvas,
        frame_interval,
        export_dir,
    })
}
