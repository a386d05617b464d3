#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for cutting silence out of recordings.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Progress parsing from `-progress pipe:2`
//! - Cancellation and timeouts via tokio
//! - A [`MediaEngine`] seam over FFmpeg for detection, extraction and concatenation
//! - Silence detection, cut planning and the extract/concatenate pipeline

pub mod command;
pub mod engine;
pub mod error;
pub mod fs_utils;
pub mod metrics;
pub mod probe;
pub mod progress;
pub mod silence_removal;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegOutput, FfmpegRunner};
pub use engine::{FfmpegEngine, MediaEngine, SegmentEncoding};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_media, MediaInfo};
pub use progress::{FfmpegProgress, ProgressCallback};
pub use silence_removal::{
    remove_silence, CutRange, SilenceCutConfig, SilenceCutError, SilenceCutResult, SilenceEvent,
};
