//! End-to-end run: detect, plan, then extract and concatenate.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::apply::extract_and_concatenate;
use super::config::SilenceCutConfig;
use super::detect::{detect_silence, SilenceEvent};
use super::error::{SilenceCutError, SilenceCutResult};
use super::planner::{compute_plan_stats, plan_cut_ranges, CutRange};
use crate::engine::MediaEngine;
use crate::fs_utils::copy_file;
use crate::metrics;

/// How the output file came to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Segments were extracted and joined.
    Concatenated {
        segments: Vec<PathBuf>,
        segments_removed: bool,
    },
    /// Nothing to cut; the input was copied unchanged.
    PassedThrough,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub events: Vec<SilenceEvent>,
    pub ranges: Vec<CutRange>,
    pub output: PathBuf,
    /// Sum of the range durations (seconds).
    pub kept_seconds: f64,
    /// Duration of the output as probed after the run, if available.
    pub output_duration: Option<f64>,
    pub outcome: RunOutcome,
}

/// Detect silences and plan ranges without touching any output.
pub async fn plan_silence_removal<E>(
    engine: &E,
    input: &Path,
    config: &SilenceCutConfig,
) -> SilenceCutResult<(Vec<SilenceEvent>, Vec<CutRange>)>
where
    E: MediaEngine + ?Sized,
{
    config.validate()?;

    let events = detect_silence(engine, input, &config.detection).await?;
    let ranges = plan_cut_ranges(&events, &config.margins)?;

    let stats = compute_plan_stats(&events, &ranges);
    info!(
        ranges = stats.range_count,
        kept_secs = format!("{:.3}", stats.kept_seconds),
        removed_secs = format!("{:.3}", stats.removed_silence_seconds),
        "Cut plan ready"
    );
    for range in &ranges {
        debug!(
            index = range.index,
            start = range.start,
            duration = range.duration,
            "Planned range"
        );
    }

    Ok((events, ranges))
}

/// Remove the silences of `input`, writing the result to `output`.
pub async fn remove_silence<E>(
    engine: &E,
    input: &Path,
    output: &Path,
    config: &SilenceCutConfig,
) -> SilenceCutResult<RunSummary>
where
    E: MediaEngine + ?Sized,
{
    let (events, ranges) = plan_silence_removal(engine, input, config).await?;

    let (outcome, kept_seconds) = if ranges.is_empty() {
        if !config.passthrough_without_cuts {
            return Err(SilenceCutError::NoCutRanges);
        }
        warn!(
            silences = events.len(),
            "Fewer than two silences detected, copying input unchanged"
        );
        copy_file(input, output)
            .await
            .map_err(|source| SilenceCutError::ConcatenationFailed { source })?;
        (RunOutcome::PassedThrough, 0.0)
    } else {
        let applied = extract_and_concatenate(engine, input, &ranges, output, &config.apply).await?;
        (
            RunOutcome::Concatenated {
                segments: applied.segments,
                segments_removed: applied.segments_removed,
            },
            applied.expected_duration,
        )
    };

    let output_duration = match engine.probe_duration(output).await {
        Ok(duration) => duration,
        Err(e) => {
            warn!(error = %e, "Could not probe output duration");
            None
        }
    };

    if let (Some(actual), RunOutcome::Concatenated { .. }) = (output_duration, &outcome) {
        let drift = (actual - kept_seconds).abs();
        if drift > config.duration_tolerance_seconds {
            warn!(
                expected_secs = format!("{:.3}", kept_seconds),
                actual_secs = format!("{:.3}", actual),
                "Output duration differs from planned ranges"
            );
        }
    }

    let removed_seconds = compute_plan_stats(&events, &ranges).removed_silence_seconds;
    let outcome_label = match outcome {
        RunOutcome::Concatenated { .. } => "concatenated",
        RunOutcome::PassedThrough => "passed_through",
    };
    metrics::record_run(outcome_label, kept_seconds, removed_seconds);

    Ok(RunSummary {
        events,
        ranges,
        output: output.to_path_buf(),
        kept_seconds,
        output_duration,
        outcome,
    })
}
