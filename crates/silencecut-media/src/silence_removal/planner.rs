//! Turning detected silences into the time ranges to keep.
//!
//! Each adjacent pair of silences brackets one stretch of sound. The range
//! runs from the end of the earlier silence to the start of the later one,
//! plus a small trailing margin:
//!
//! ```text
//!   silence[i-1]          kept range i-1            silence[i]
//! |░░░░░░░░░░░░|▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓+m|░░░░░░░░░░░░░░░|
//!              ^ start                       ^ silence[i].start()
//! ```
//!
//! Sound before the first silence and after the last one is dropped.

use serde::{Deserialize, Serialize};

use super::config::MarginConfig;
use super::detect::SilenceEvent;
use super::error::{SilenceCutError, SilenceCutResult};

/// A window of the source to extract as one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutRange {
    /// Zero-based position in the plan; also the concatenation position.
    pub index: usize,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds, margin included.
    pub duration: f64,
}

impl CutRange {
    /// End time in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Compute the ranges to keep, one per adjacent pair of events.
///
/// Fewer than two events give an empty plan. A range whose duration is not
/// positive (events out of order or overlapping) rejects the whole plan.
pub fn plan_cut_ranges(
    events: &[SilenceEvent],
    margins: &MarginConfig,
) -> SilenceCutResult<Vec<CutRange>> {
    let count = events.len().saturating_sub(1);

    events
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let (prev, current) = (&pair[0], &pair[1]);
            let start = prev.silence_end;
            let duration = current.start() - start + margins.margin_for(index, count);

            if !start.is_finite() || !duration.is_finite() || duration <= 0.0 {
                return Err(SilenceCutError::InvalidRange {
                    index,
                    start,
                    duration,
                });
            }

            Ok(CutRange {
                index,
                start,
                duration,
            })
        })
        .collect()
}

/// Aggregate numbers about a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanStats {
    /// Number of ranges.
    pub range_count: usize,
    /// Sum of all range durations (seconds).
    pub kept_seconds: f64,
    /// Sum of the silences between kept ranges (seconds).
    pub removed_silence_seconds: f64,
}

/// Calculate statistics about a plan.
pub fn compute_plan_stats(events: &[SilenceEvent], ranges: &[CutRange]) -> PlanStats {
    let kept_seconds = ranges.iter().map(|r| r.duration).sum();
    let removed_silence_seconds = events
        .iter()
        .skip(1)
        .take(ranges.len())
        .map(|e| e.silence_duration)
        .sum();

    PlanStats {
        range_count: ranges.len(),
        kept_seconds,
        removed_silence_seconds,
    }
}
