//! `silencecut` command-line front end.

pub mod config;
pub mod logging;

use anyhow::Context;
use serde::Serialize;
use tokio::sync::watch;
use tracing::Instrument;

use silencecut_media::silence_removal::{plan_silence_removal, remove_silence, RunOutcome};
use silencecut_media::{check_ffmpeg, CutRange, FfmpegEngine, FfmpegRunner, SilenceEvent};

pub use config::{CliArgs, LogFormat, RunConfig};
pub use logging::{init_tracing, RunLogger};

/// Plan printed by `--dry-run`.
#[derive(Debug, Serialize)]
pub struct DryRunPlan {
    pub events: Vec<SilenceEvent>,
    pub ranges: Vec<CutRange>,
    pub kept_seconds: f64,
}

/// Build the FFmpeg engine for a run.
pub fn build_engine(config: &RunConfig, cancel_rx: watch::Receiver<bool>) -> FfmpegEngine {
    let mut runner = FfmpegRunner::new().with_cancel(cancel_rx);
    if let Some(secs) = config.timeout_secs {
        runner = runner.with_timeout(secs);
    }
    FfmpegEngine::new().with_runner(runner)
}

/// Execute one run. Setting `cancel_rx` to `true` kills running FFmpeg processes.
pub async fn run(config: RunConfig, cancel_rx: watch::Receiver<bool>) -> anyhow::Result<()> {
    check_ffmpeg().context("silencecut needs ffmpeg on PATH")?;

    let logger = RunLogger::new(if config.dry_run { "plan" } else { "remove_silence" });
    let span = logger.create_span();
    let engine = build_engine(&config, cancel_rx);

    execute(&engine, &config, &logger).instrument(span).await
}

async fn execute(
    engine: &FfmpegEngine,
    config: &RunConfig,
    logger: &RunLogger,
) -> anyhow::Result<()> {
    logger.log_start(&format!(
        "{} -> {}",
        config.input.display(),
        config.output.display()
    ));

    if config.dry_run {
        let (events, ranges) = plan_silence_removal(engine, &config.input, &config.cut)
            .await
            .map_err(|e| {
                logger.log_error(&e.to_string());
                e
            })?;
        let plan = DryRunPlan {
            kept_seconds: ranges.iter().map(|r| r.duration).sum(),
            events,
            ranges,
        };
        println!("{}", serde_json::to_string_pretty(&plan)?);
        logger.log_completion(&format!("planned {} ranges", plan.ranges.len()));
        return Ok(());
    }

    let summary = remove_silence(engine, &config.input, &config.output, &config.cut)
        .await
        .map_err(|e| {
            logger.log_error(&e.to_string());
            if let Some(diagnostics) = e.diagnostics() {
                logger.log_error(&format!("FFmpeg output:\n{}", diagnostics));
            }
            e
        })
        .with_context(|| format!("failed to remove silence from {}", config.input.display()))?;

    match &summary.outcome {
        RunOutcome::PassedThrough => logger.log_warning(&format!(
            "{} silence(s) detected, output is an unchanged copy",
            summary.events.len()
        )),
        RunOutcome::Concatenated { segments, .. } => logger.log_completion(&format!(
            "{} segments, {:.2}s kept -> {}",
            segments.len(),
            summary.kept_seconds,
            summary.output.display()
        )),
    }

    Ok(())
}
