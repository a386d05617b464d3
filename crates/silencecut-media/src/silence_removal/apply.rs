//! Extract the kept ranges and join them into the output file.
//!
//! # Strategy
//!
//! 1. Every range is re-encoded to its own segment file. Extractions run
//!    concurrently (bounded by `max_parallel_extractions`) and may finish in
//!    any order.
//! 2. Once *all* of them succeeded, the segment files are concatenated in
//!    range order.
//!
//! The first failed extraction ends the run: the remaining extraction futures
//! are dropped, which kills their FFmpeg processes, and concatenation is never
//! attempted with a partial set.

use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use super::config::ApplyConfig;
use super::error::{SilenceCutError, SilenceCutResult};
use super::planner::CutRange;
use crate::engine::MediaEngine;
use crate::fs_utils::remove_files_best_effort;
use crate::metrics;
use crate::progress::FfmpegProgress;

/// What the extract + concatenate phase produced.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// Segment files in concatenation order.
    pub segments: Vec<PathBuf>,
    /// Whether the segment files were deleted after concatenation.
    pub segments_removed: bool,
    /// Sum of the range durations (seconds).
    pub expected_duration: f64,
}

/// Extract every range of `input` and concatenate the pieces into `output`.
pub async fn extract_and_concatenate<E>(
    engine: &E,
    input: &Path,
    ranges: &[CutRange],
    output: &Path,
    config: &ApplyConfig,
) -> SilenceCutResult<ApplyOutcome>
where
    E: MediaEngine + ?Sized,
{
    if ranges.is_empty() {
        return Err(SilenceCutError::NoCutRanges);
    }
    config.validate()?;
    tokio::fs::create_dir_all(&config.work_dir).await?;

    let segments = extract_all(engine, input, ranges, config).await?;
    let expected_duration: f64 = ranges.iter().map(|r| r.duration).sum();

    info!(
        segments = segments.len(),
        output = %output.display(),
        "Merge process start"
    );

    let started = Instant::now();
    let total_ms = (expected_duration * 1000.0).round() as i64;
    let on_progress = Box::new(move |progress: FfmpegProgress| {
        let eta = progress
            .eta_seconds(total_ms)
            .map(|secs| format!("{:.0}s", secs))
            .unwrap_or_else(|| "unknown".to_string());
        info!(
            percent = format!("{:.1}", progress.percentage(total_ms)),
            eta = %eta,
            "Merge progress"
        );
    });

    if let Err(source) = engine.concatenate(&segments, output, on_progress).await {
        error!(
            error = %source,
            work_dir = %config.work_dir.display(),
            "Merge failed, segment files left in place"
        );
        return Err(SilenceCutError::ConcatenationFailed { source });
    }
    metrics::record_concatenation(started.elapsed().as_secs_f64());

    info!(output = %output.display(), "Merge processing finished");

    let segments_removed = if config.keep_segments {
        false
    } else {
        let removed = remove_files_best_effort(&segments).await;
        debug!(removed = removed.len(), "Removed segment files");
        removed.len() == segments.len()
    };

    Ok(ApplyOutcome {
        segments,
        segments_removed,
        expected_duration,
    })
}

/// Extract all ranges; returns segment paths in range order.
async fn extract_all<E>(
    engine: &E,
    input: &Path,
    ranges: &[CutRange],
    config: &ApplyConfig,
) -> SilenceCutResult<Vec<PathBuf>>
where
    E: MediaEngine + ?Sized,
{
    let mut extractions = stream::iter(ranges.iter().enumerate())
        .map(|(slot, range)| {
            let segment = config.segment_path(range.index);
            async move {
                let started = Instant::now();
                let result = engine.extract_range(input, range, &segment).await;
                (slot, range.index, segment, result, started.elapsed())
            }
        })
        .buffer_unordered(config.max_parallel_extractions);

    let mut segments: Vec<Option<PathBuf>> = vec![None; ranges.len()];

    while let Some((slot, index, segment, result, elapsed)) = extractions.next().await {
        match result {
            Ok(()) => {
                metrics::record_segment_extracted(elapsed.as_secs_f64());
                info!(
                    index = index,
                    segment = %segment.display(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Processing finished"
                );
                segments[slot] = Some(segment);
            }
            Err(source) => {
                metrics::record_extraction_failure();
                error!(
                    index = index,
                    error = %source,
                    "Segment extraction failed, cancelling remaining extractions"
                );
                return Err(SilenceCutError::ExtractionFailed { index, source });
            }
        }
    }

    segments
        .into_iter()
        .enumerate()
        .map(|(slot, segment)| {
            segment.ok_or_else(|| {
                warn!(slot = slot, "Extraction finished without a segment");
                SilenceCutError::ExtractionFailed {
                    index: ranges[slot].index,
                    source: crate::error::MediaError::Cancelled,
                }
            })
        })
        .collect()
}
