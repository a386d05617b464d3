//! Errors from a silence removal run.

use thiserror::Error;

use crate::error::MediaError;

/// Result type for silence removal operations.
pub type SilenceCutResult<T> = Result<T, SilenceCutError>;

/// Every failure is terminal for the run.
#[derive(Error, Debug)]
pub enum SilenceCutError {
    #[error("Silence detection failed: {source}")]
    DetectionFailed {
        #[source]
        source: MediaError,
    },

    #[error("Malformed silence report at line {line} ({reason}): {content:?}")]
    ParseFailed {
        /// 1-based line number within the report
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Invalid cut range {index}: start {start:.5}s, duration {duration:.5}s")]
    InvalidRange {
        index: usize,
        start: f64,
        duration: f64,
    },

    #[error("Extraction of range {index} failed: {source}")]
    ExtractionFailed {
        index: usize,
        #[source]
        source: MediaError,
    },

    #[error("Concatenation failed: {source}")]
    ConcatenationFailed {
        #[source]
        source: MediaError,
    },

    #[error("Fewer than two silences detected, nothing to cut")]
    NoCutRanges,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SilenceCutError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Engine diagnostic text attached to the failure, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::DetectionFailed { source }
            | Self::ExtractionFailed { source, .. }
            | Self::ConcatenationFailed { source } => source.diagnostics(),
            _ => None,
        }
    }

    /// Index of the cut range the failure refers to, if any.
    pub fn range_index(&self) -> Option<usize> {
        match self {
            Self::InvalidRange { index, .. } | Self::ExtractionFailed { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}
