//! Configuration for silence removal.
//!
//! These parameters control how aggressively silence is detected and how much
//! padding is kept at each splice point. The defaults suit screen recordings
//! with a single narrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::{SilenceCutError, SilenceCutResult};

/// Parameters for FFmpeg's `silencedetect` filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Noise floor in dB; anything quieter counts as silence.
    ///
    /// - Lower values (-40dB): only near-digital silence is detected
    /// - Default (-20dB): room tone and breathing count as silence
    pub noise_threshold_db: f64,

    /// Minimum length (seconds) a quiet stretch needs to be reported.
    pub min_silence_duration: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            noise_threshold_db: -20.0,
            min_silence_duration: 0.5,
        }
    }
}

impl DetectionParams {
    /// Render the `silencedetect` filter expression.
    pub fn filter(&self) -> String {
        format!(
            "silencedetect=n={}dB:d={}",
            self.noise_threshold_db, self.min_silence_duration
        )
    }

    pub fn validate(&self) -> SilenceCutResult<()> {
        if !self.noise_threshold_db.is_finite() || self.noise_threshold_db > 0.0 {
            return Err(SilenceCutError::invalid_config(format!(
                "noise threshold must be a finite dB value <= 0, got {}",
                self.noise_threshold_db
            )));
        }
        if !self.min_silence_duration.is_finite() || self.min_silence_duration < 0.0 {
            return Err(SilenceCutError::invalid_config(format!(
                "minimum silence duration must be >= 0 seconds, got {}",
                self.min_silence_duration
            )));
        }
        Ok(())
    }
}

/// Trailing padding appended to each cut range.
///
/// A little air after each segment makes splices feel less abrupt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginConfig {
    /// Padding after every range except the last (seconds).
    pub interior_margin_seconds: f64,
    /// Padding after the last range (seconds).
    pub final_margin_seconds: f64,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            interior_margin_seconds: 0.1,
            final_margin_seconds: 0.5,
        }
    }
}

impl MarginConfig {
    /// Margin for the range at `index` out of `count` ranges.
    pub fn margin_for(&self, index: usize, count: usize) -> f64 {
        if index + 1 == count {
            self.final_margin_seconds
        } else {
            self.interior_margin_seconds
        }
    }

    pub fn validate(&self) -> SilenceCutResult<()> {
        for (name, value) in [
            ("interior margin", self.interior_margin_seconds),
            ("final margin", self.final_margin_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SilenceCutError::invalid_config(format!(
                    "{} must be >= 0 seconds, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Settings for the extract + concatenate phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyConfig {
    /// Directory that receives the segment files.
    pub work_dir: PathBuf,
    /// Segment file stem; segment `n` (1-based) is `{prefix}{n}.{ext}`.
    pub segment_prefix: String,
    /// Segment file extension.
    pub segment_extension: String,
    /// Maximum number of FFmpeg extractions running at once.
    pub max_parallel_extractions: usize,
    /// Keep segment files after a successful concatenation.
    pub keep_segments: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("resources"),
            segment_prefix: "output".to_string(),
            segment_extension: "mp4".to_string(),
            max_parallel_extractions: 4,
            keep_segments: false,
        }
    }
}

impl ApplyConfig {
    /// Path of the segment file for the range at zero-based `index`.
    pub fn segment_path(&self, index: usize) -> PathBuf {
        self.work_dir.join(format!(
            "{}{}.{}",
            self.segment_prefix,
            index + 1,
            self.segment_extension
        ))
    }

    pub fn validate(&self) -> SilenceCutResult<()> {
        if self.max_parallel_extractions == 0 {
            return Err(SilenceCutError::invalid_config(
                "max parallel extractions must be at least 1",
            ));
        }
        if self.segment_prefix.is_empty() || self.segment_prefix.contains(['/', '\\']) {
            return Err(SilenceCutError::invalid_config(format!(
                "invalid segment prefix {:?}",
                self.segment_prefix
            )));
        }
        Ok(())
    }
}

/// Full configuration for one silence removal run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilenceCutConfig {
    pub detection: DetectionParams,
    pub margins: MarginConfig,
    pub apply: ApplyConfig,
    /// Copy the input unchanged when there is nothing to cut.
    ///
    /// With fewer than two detected silences no cut range can be formed; when
    /// this is off such runs fail with `NoCutRanges` instead.
    pub passthrough_without_cuts: bool,
    /// Allowed difference between the output duration and the sum of the
    /// planned ranges before a warning is logged (seconds).
    pub duration_tolerance_seconds: f64,
}

impl Default for SilenceCutConfig {
    fn default() -> Self {
        Self {
            detection: DetectionParams::default(),
            margins: MarginConfig::default(),
            apply: ApplyConfig::default(),
            passthrough_without_cuts: true,
            duration_tolerance_seconds: 0.5,
        }
    }
}

impl SilenceCutConfig {
    /// Builder-style setter for the noise threshold.
    pub fn with_noise_threshold_db(mut self, db: f64) -> Self {
        self.detection.noise_threshold_db = db;
        self
    }

    /// Builder-style setter for the minimum silence duration.
    pub fn with_min_silence_duration(mut self, seconds: f64) -> Self {
        self.detection.min_silence_duration = seconds;
        self
    }

    /// Builder-style setter for both margins.
    pub fn with_margins(mut self, interior: f64, last: f64) -> Self {
        self.margins = MarginConfig {
            interior_margin_seconds: interior,
            final_margin_seconds: last,
        };
        self
    }

    /// Builder-style setter for the segment work directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.apply.work_dir = dir.into();
        self
    }

    /// Builder-style setter for extraction parallelism.
    pub fn with_max_parallel_extractions(mut self, n: usize) -> Self {
        self.apply.max_parallel_extractions = n;
        self
    }

    /// Builder-style setter for keeping segment files.
    pub fn with_keep_segments(mut self, keep: bool) -> Self {
        self.apply.keep_segments = keep;
        self
    }

    /// Builder-style setter for pass-through behaviour.
    pub fn with_passthrough(mut self, enabled: bool) -> Self {
        self.passthrough_without_cuts = enabled;
        self
    }

    /// Check every section.
    pub fn validate(&self) -> SilenceCutResult<()> {
        self.detection.validate()?;
        self.margins.validate()?;
        self.apply.validate()?;
        if !self.duration_tolerance_seconds.is_finite() || self.duration_tolerance_seconds < 0.0 {
            return Err(SilenceCutError::invalid_config(format!(
                "duration tolerance must be >= 0 seconds, got {}",
                self.duration_tolerance_seconds
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SilenceCutConfig::default();
        assert!((config.detection.noise_threshold_db + 20.0).abs() < f64::EPSILON);
        assert!((config.detection.min_silence_duration - 0.5).abs() < f64::EPSILON);
        assert!((config.margins.interior_margin_seconds - 0.1).abs() < f64::EPSILON);
        assert!((config.margins.final_margin_seconds - 0.5).abs() < f64::EPSILON);
        assert!(config.passthrough_without_cuts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_filter_expression() {
        assert_eq!(
            DetectionParams::default().filter(),
            "silencedetect=n=-20dB:d=0.5"
        );
        let params = DetectionParams {
            noise_threshold_db: -35.5,
            min_silence_duration: 1.0,
        };
        assert_eq!(params.filter(), "silencedetect=n=-35.5dB:d=1");
    }

    #[test]
    fn test_margin_for_last_range() {
        let margins = MarginConfig::default();
        assert!((margins.margin_for(0, 3) - 0.1).abs() < f64::EPSILON);
        assert!((margins.margin_for(1, 3) - 0.1).abs() < f64::EPSILON);
        assert!((margins.margin_for(2, 3) - 0.5).abs() < f64::EPSILON);
        assert!((margins.margin_for(0, 1) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_segment_paths() {
        let apply = ApplyConfig::default();
        assert_eq!(apply.segment_path(0), PathBuf::from("resources/output1.mp4"));
        assert_eq!(apply.segment_path(4), PathBuf::from("resources/output5.mp4"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SilenceCutConfig::default()
            .with_noise_threshold_db(-30.0)
            .with_min_silence_duration(1.2)
            .with_margins(0.2, 0.8)
            .with_max_parallel_extractions(2)
            .with_keep_segments(true);

        assert!((config.detection.noise_threshold_db + 30.0).abs() < f64::EPSILON);
        assert!((config.margins.final_margin_seconds - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.apply.max_parallel_extractions, 2);
        assert!(config.apply.keep_segments);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let positive_db = SilenceCutConfig::default().with_noise_threshold_db(3.0);
        assert!(matches!(
            positive_db.validate(),
            Err(SilenceCutError::InvalidConfig(_))
        ));

        let negative_duration = SilenceCutConfig::default().with_min_silence_duration(-1.0);
        assert!(negative_duration.validate().is_err());

        let nan_margin = SilenceCutConfig::default().with_margins(f64::NAN, 0.5);
        assert!(nan_margin.validate().is_err());

        let no_workers = SilenceCutConfig::default().with_max_parallel_extractions(0);
        assert!(no_workers.validate().is_err());
    }
}
