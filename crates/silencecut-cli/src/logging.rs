//! Tracing setup and structured run logging.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use crate::config::LogFormat;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `silencecut=info` filter.
pub fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("silencecut=info,silencecut_media=info,silencecut_cli=info")
    });

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(env_filter)
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_ansi(true)
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .with(env_filter)
                .init();
        }
    }
}

/// Run logger for structured logging with consistent formatting.
///
/// Every event carries the run ID and the current phase.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    phase: String,
}

impl RunLogger {
    /// Create a logger with a fresh run ID.
    pub fn new(phase: &str) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            phase: phase.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            phase = %self.phase,
            "Run started: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            phase = %self.phase,
            "Run warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            phase = %self.phase,
            "Run error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            phase = %self.phase,
            "Run completed: {}", message
        );
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn phase_name(&self) -> &str {
        &self.phase
    }

    /// Span to instrument the whole run with.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "run",
            run_id = %self.run_id,
            phase = %self.phase
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_logger_creation() {
        let logger = RunLogger::new("remove_silence");
        assert_eq!(logger.phase_name(), "remove_silence");
        assert!(Uuid::parse_str(logger.run_id()).is_ok());
    }
}
