//! Metrics for silence removal runs.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host application installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const SILENCES_DETECTED_TOTAL: &str = "silencecut_silences_detected_total";
    pub const SEGMENTS_EXTRACTED_TOTAL: &str = "silencecut_segments_extracted_total";
    pub const EXTRACTION_FAILURES_TOTAL: &str = "silencecut_extraction_failures_total";
    pub const RUNS_TOTAL: &str = "silencecut_runs_total";
    pub const FFMPEG_DURATION_SECONDS: &str = "silencecut_ffmpeg_duration_seconds";
    pub const KEPT_SECONDS: &str = "silencecut_kept_seconds";
    pub const REMOVED_SECONDS: &str = "silencecut_removed_seconds";
}

/// Record the number of silences found in one detection pass.
pub fn record_silences_detected(count: usize) {
    counter!(names::SILENCES_DETECTED_TOTAL).increment(count as u64);
}

/// Record a finished segment extraction.
pub fn record_segment_extracted(duration_secs: f64) {
    counter!(names::SEGMENTS_EXTRACTED_TOTAL).increment(1);
    histogram!(names::FFMPEG_DURATION_SECONDS, "operation" => "extract").record(duration_secs);
}

/// Record a failed segment extraction.
pub fn record_extraction_failure() {
    counter!(names::EXTRACTION_FAILURES_TOTAL).increment(1);
}

/// Record a finished concatenation.
pub fn record_concatenation(duration_secs: f64) {
    histogram!(names::FFMPEG_DURATION_SECONDS, "operation" => "concat").record(duration_secs);
}

/// Record the outcome of a run.
pub fn record_run(outcome: &'static str, kept_secs: f64, removed_secs: f64) {
    counter!(names::RUNS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(names::KEPT_SECONDS).record(kept_secs);
    histogram!(names::REMOVED_SECONDS).record(removed_secs);
}
