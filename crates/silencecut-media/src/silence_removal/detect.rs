//! Silence detection via FFmpeg's `silencedetect` filter.
//!
//! FFmpeg writes one line per finished silence to its diagnostic stream:
//!
//! ```text
//! [silencedetect @ 0x5581c9a0] silence_start: 6.45397
//! [silencedetect @ 0x5581c9a0] silence_end: 8.15621 | silence_duration: 1.70224
//! ```
//!
//! Only the `silence_end` lines are used; the start is recovered as
//! `end - duration`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::DetectionParams;
use super::error::{SilenceCutError, SilenceCutResult};
use crate::engine::MediaEngine;
use crate::metrics;

const END_KEY: &str = "silence_end:";
const DURATION_KEY: &str = "silence_duration:";

/// One detected silent interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilenceEvent {
    /// Timestamp at which the silence ends (seconds).
    pub silence_end: f64,
    /// How long the silence lasted (seconds).
    pub silence_duration: f64,
}

impl SilenceEvent {
    pub fn new(silence_end: f64, silence_duration: f64) -> Self {
        Self {
            silence_end,
            silence_duration,
        }
    }

    /// Timestamp at which the silence starts (seconds).
    pub fn start(&self) -> f64 {
        self.silence_end - self.silence_duration
    }
}

/// Run silence analysis on `input` and return events in report order.
pub async fn detect_silence<E>(
    engine: &E,
    input: &Path,
    params: &DetectionParams,
) -> SilenceCutResult<Vec<SilenceEvent>>
where
    E: MediaEngine + ?Sized,
{
    params.validate()?;

    debug!(
        path = %input.display(),
        filter = %params.filter(),
        "Starting silence detection"
    );

    let report = engine
        .detect_silence(input, params)
        .await
        .map_err(|source| SilenceCutError::DetectionFailed { source })?;

    let events = parse_silence_report(&report)?;

    metrics::record_silences_detected(events.len());
    info!(
        silences = events.len(),
        total_silence_secs = format!(
            "{:.3}",
            events.iter().map(|e| e.silence_duration).sum::<f64>()
        ),
        "Silence detection complete"
    );
    for event in &events {
        debug!(
            silence_end = event.silence_end,
            silence_duration = event.silence_duration,
            "Detected silence"
        );
    }

    Ok(events)
}

/// Parse a `silencedetect` report into events.
///
/// Lines without `silence_end` are ignored. A `silence_end` line that does not
/// yield a usable end/duration pair is an error rather than a skipped event.
pub fn parse_silence_report(report: &str) -> SilenceCutResult<Vec<SilenceEvent>> {
    report
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains("silence_end"))
        .map(|(i, line)| parse_silence_line(line).map_err(|reason| parse_error(i + 1, line, reason)))
        .collect()
}

fn parse_error(line: usize, content: &str, reason: String) -> SilenceCutError {
    SilenceCutError::ParseFailed {
        line,
        content: content.trim().to_string(),
        reason,
    }
}

fn parse_silence_line(line: &str) -> Result<SilenceEvent, String> {
    let silence_end = field_after(line, END_KEY)?;
    let silence_duration = field_after(line, DURATION_KEY)?;

    if silence_end < 0.0 {
        return Err(format!("negative silence end {}", silence_end));
    }
    if silence_duration <= 0.0 {
        return Err(format!("non-positive silence duration {}", silence_duration));
    }

    Ok(SilenceEvent::new(silence_end, silence_duration))
}

/// The whitespace token following `key`, parsed as a finite float.
fn field_after(line: &str, key: &str) -> Result<f64, String> {
    let mut tokens = line.split_whitespace();
    tokens
        .by_ref()
        .find(|t| *t == key)
        .ok_or_else(|| format!("missing `{}`", key.trim_end_matches(':')))?;

    let raw = tokens
        .next()
        .ok_or_else(|| format!("no value after `{}`", key.trim_end_matches(':')))?;

    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("`{}` is not finite", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'resources/original.mp4':
  Duration: 00:00:12.05, start: 0.000000, bitrate: 1183 kb/s
[silencedetect @ 0x5581c9a0] silence_start: 0
[silencedetect @ 0x5581c9a0] silence_end: 1.70011 | silence_duration: 1.70011
[silencedetect @ 0x5581c9a0] silence_start: 6.45397
[silencedetect @ 0x5581c9a0] silence_end: 8.15621 | silence_duration: 1.70224
[silencedetect @ 0x5581c9a0] silence_start: 8.99922
[silencedetect @ 0x5581c9a0] silence_end: 10.5697 | silence_duration: 1.57048
size=N/A time=00:00:12.05 bitrate=N/A speed= 412x";

    #[test]
    fn test_parse_report() {
        let events = parse_silence_report(REPORT).unwrap();
        assert_eq!(
            events,
            vec![
                SilenceEvent::new(1.70011, 1.70011),
                SilenceEvent::new(8.15621, 1.70224),
                SilenceEvent::new(10.5697, 1.57048),
            ]
        );
    }

    #[test]
    fn test_event_start() {
        let event = SilenceEvent::new(8.15621, 1.70224);
        assert!((event.start() - 6.45397).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report() {
        assert!(parse_silence_report("").unwrap().is_empty());
        assert!(parse_silence_report("Stream mapping:\n  Stream #0:1 -> #0:0")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_duration_fails() {
        let report = "ok\n[silencedetect @ 0x1] silence_end: 4.2\n";
        match parse_silence_report(report) {
            Err(SilenceCutError::ParseFailed { line, content, .. }) => {
                assert_eq!(line, 2);
                assert!(content.contains("silence_end: 4.2"));
            }
            other => panic!("expected ParseFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_value_fails() {
        let report = "[silencedetect @ 0x1] silence_end: abc | silence_duration: 1.0";
        assert!(matches!(
            parse_silence_report(report),
            Err(SilenceCutError::ParseFailed { line: 1, .. })
        ));
    }

    #[test]
    fn test_nan_value_fails() {
        let report = "[silencedetect @ 0x1] silence_end: 2.0 | silence_duration: nan";
        assert!(matches!(
            parse_silence_report(report),
            Err(SilenceCutError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_zero_duration_fails() {
        let report = "[silencedetect @ 0x1] silence_end: 2.0 | silence_duration: 0";
        assert!(matches!(
            parse_silence_report(report),
            Err(SilenceCutError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_truncated_line_fails() {
        let report = "[silencedetect @ 0x1] silence_end: 2.0 | silence_duration:";
        assert!(matches!(
            parse_silence_report(report),
            Err(SilenceCutError::ParseFailed { .. })
        ));
    }
}
