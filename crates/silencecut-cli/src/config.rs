//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use silencecut_media::SilenceCutConfig;

/// Cut silent stretches out of a recording.
///
/// Every option can also be set through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "silencecut", version, about, long_about = None)]
pub struct CliArgs {
    /// Directory holding the input, the segment files and the output
    #[arg(long, env = "SILENCECUT_RESOURCES_DIR", default_value = "resources")]
    pub resources_dir: PathBuf,

    /// Input video [default: <resources-dir>/original.mp4]
    #[arg(short, long, env = "SILENCECUT_INPUT")]
    pub input: Option<PathBuf>,

    /// Output video [default: <resources-dir>/mergedVideo.mp4]
    #[arg(short, long, env = "SILENCECUT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Noise floor in dB below which audio counts as silence
    #[arg(
        long,
        env = "SILENCECUT_NOISE_DB",
        default_value_t = -20.0,
        allow_negative_numbers = true
    )]
    pub noise_threshold_db: f64,

    /// Minimum silence length in seconds
    #[arg(long, env = "SILENCECUT_MIN_SILENCE", default_value_t = 0.5)]
    pub min_silence_duration: f64,

    /// Padding kept after every segment but the last (seconds)
    #[arg(long, env = "SILENCECUT_INTERIOR_MARGIN", default_value_t = 0.1)]
    pub interior_margin: f64,

    /// Padding kept after the last segment (seconds)
    #[arg(long, env = "SILENCECUT_FINAL_MARGIN", default_value_t = 0.5)]
    pub final_margin: f64,

    /// Maximum concurrent segment extractions
    #[arg(long, env = "SILENCECUT_MAX_PARALLEL", default_value_t = 4)]
    pub max_parallel: usize,

    /// Kill any single FFmpeg invocation running longer than this (seconds)
    #[arg(long, env = "SILENCECUT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Keep the intermediate segment files
    #[arg(
        long,
        env = "SILENCECUT_KEEP_SEGMENTS",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub keep_segments: bool,

    /// Fail instead of copying the input when there is nothing to cut
    #[arg(long)]
    pub no_passthrough: bool,

    /// Only detect and plan; print the plan as JSON
    #[arg(long)]
    pub dry_run: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Colored, human readable
    Pretty,
    /// One JSON object per line
    Json,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cut: SilenceCutConfig,
    pub timeout_secs: Option<u64>,
    pub dry_run: bool,
}

impl CliArgs {
    /// Resolve defaults that depend on other options.
    pub fn into_run_config(self) -> RunConfig {
        let input = self
            .input
            .unwrap_or_else(|| self.resources_dir.join("original.mp4"));
        let output = self
            .output
            .unwrap_or_else(|| self.resources_dir.join("mergedVideo.mp4"));

        let cut = SilenceCutConfig::default()
            .with_noise_threshold_db(self.noise_threshold_db)
            .with_min_silence_duration(self.min_silence_duration)
            .with_margins(self.interior_margin, self.final_margin)
            .with_work_dir(self.resources_dir)
            .with_max_parallel_extractions(self.max_parallel)
            .with_keep_segments(self.keep_segments)
            .with_passthrough(!self.no_passthrough);

        RunConfig {
            input,
            output,
            cut,
            timeout_secs: self.timeout_secs,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunConfig {
        CliArgs::try_parse_from(std::iter::once("silencecut").chain(args.iter().copied()))
            .unwrap()
            .into_run_config()
    }

    #[test]
    fn test_defaults_follow_resources_layout() {
        let config = parse(&[]);
        assert_eq!(config.input, PathBuf::from("resources/original.mp4"));
        assert_eq!(config.output, PathBuf::from("resources/mergedVideo.mp4"));
        assert_eq!(config.cut.apply.work_dir, PathBuf::from("resources"));
        assert!(config.cut.passthrough_without_cuts);
        assert!(!config.dry_run);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_resources_dir_moves_defaults() {
        let config = parse(&["--resources-dir", "/data/rec"]);
        assert_eq!(config.input, PathBuf::from("/data/rec/original.mp4"));
        assert_eq!(config.output, PathBuf::from("/data/rec/mergedVideo.mp4"));
    }

    #[test]
    fn test_detection_options() {
        let config = parse(&[
            "--noise-threshold-db",
            "-35",
            "--min-silence-duration",
            "1.25",
            "--interior-margin",
            "0.2",
            "--final-margin",
            "1",
        ]);
        assert!((config.cut.detection.noise_threshold_db + 35.0).abs() < f64::EPSILON);
        assert!((config.cut.detection.min_silence_duration - 1.25).abs() < f64::EPSILON);
        assert!((config.cut.margins.interior_margin_seconds - 0.2).abs() < f64::EPSILON);
        assert!((config.cut.margins.final_margin_seconds - 1.0).abs() < f64::EPSILON);
        assert!(config.cut.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let config = parse(&[
            "-i",
            "talk.mkv",
            "-o",
            "talk-cut.mkv",
            "--keep-segments",
            "--no-passthrough",
            "--dry-run",
            "--timeout-secs",
            "600",
            "--max-parallel",
            "2",
        ]);
        assert_eq!(config.input, PathBuf::from("talk.mkv"));
        assert_eq!(config.output, PathBuf::from("talk-cut.mkv"));
        assert!(config.cut.apply.keep_segments);
        assert!(!config.cut.passthrough_without_cuts);
        assert!(config.dry_run);
        assert_eq!(config.timeout_secs, Some(600));
        assert_eq!(config.cut.apply.max_parallel_extractions, 2);
    }

    #[test]
    fn test_keep_segments_from_env_accepts_numeric_truthy() {
        // Only this test touches SILENCECUT_KEEP_SEGMENTS
        std::env::set_var("SILENCECUT_KEEP_SEGMENTS", "1");
        let enabled = CliArgs::try_parse_from(["silencecut"]).map(|a| a.keep_segments);
        std::env::set_var("SILENCECUT_KEEP_SEGMENTS", "0");
        let disabled = CliArgs::try_parse_from(["silencecut"]).map(|a| a.keep_segments);
        std::env::remove_var("SILENCECUT_KEEP_SEGMENTS");

        assert!(enabled.unwrap());
        assert!(!disabled.unwrap());
    }

    #[test]
    fn test_log_format() {
        let args = CliArgs::try_parse_from(["silencecut", "--log-format", "json"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_non_numeric_threshold() {
        let result = CliArgs::try_parse_from(["silencecut", "--noise-threshold-db", "loud"]);
        assert!(result.is_err());
    }
}
