//! Silence removal driven by FFmpeg's `silencedetect` filter.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ Input video  │───►│ silencedetect│───►│ Planner      │
//! │              │    │ (end, dur)   │    │ (CutRanges)  │
//! └──────────────┘    └──────────────┘    └──────────────┘
//!                                                │
//!                                                ▼
//!                     ┌──────────────┐    ┌──────────────┐
//!                     │ Output video │◄───│ extract each │
//!                     │ (concat)     │    │ range (||)   │
//!                     └──────────────┘    └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use silencecut_media::engine::FfmpegEngine;
//! use silencecut_media::silence_removal::{remove_silence, SilenceCutConfig};
//!
//! let engine = FfmpegEngine::new();
//! let config = SilenceCutConfig::default().with_work_dir("resources");
//! let summary = remove_silence(&engine, &input_path, &output_path, &config).await?;
//! ```

mod apply;
mod config;
mod detect;
mod error;
mod pipeline;
mod planner;

pub use apply::{extract_and_concatenate, ApplyOutcome};
pub use config::{ApplyConfig, DetectionParams, MarginConfig, SilenceCutConfig};
pub use detect::{detect_silence, parse_silence_report, SilenceEvent};
pub use error::{SilenceCutError, SilenceCutResult};
pub use pipeline::{plan_silence_removal, remove_silence, RunOutcome, RunSummary};
pub use planner::{compute_plan_stats, plan_cut_ranges, CutRange, PlanStats};
