//! The media engine seam.
//!
//! The silence removal pipeline never spawns FFmpeg directly; it goes through
//! [`MediaEngine`], so tests can script detection reports and make individual
//! extractions fail.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::ensure_parent_dir;
use crate::probe::probe_media;
use crate::progress::ProgressCallback;
use crate::silence_removal::{CutRange, DetectionParams};

/// Operations the pipeline needs from a media toolkit.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Run silence analysis over the audio track and return the raw report.
    async fn detect_silence(&self, input: &Path, params: &DetectionParams) -> MediaResult<String>;

    /// Re-encode `[range.start, range.end())` of `input` into `output`.
    async fn extract_range(&self, input: &Path, range: &CutRange, output: &Path)
        -> MediaResult<()>;

    /// Join `inputs`, in order, into `output`.
    async fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        on_progress: ProgressCallback,
    ) -> MediaResult<()>;

    /// Duration of a media file in seconds, when the engine can tell.
    async fn probe_duration(&self, _path: &Path) -> MediaResult<Option<f64>> {
        Ok(None)
    }
}

/// Encoding settings for extracted segments.
#[derive(Debug, Clone)]
pub struct SegmentEncoding {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for SegmentEncoding {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 20,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

/// [`MediaEngine`] backed by the `ffmpeg` and `ffprobe` binaries.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEngine {
    runner: FfmpegRunner,
    encoding: SegmentEncoding,
}

impl FfmpegEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill any FFmpeg invocation that runs longer than `secs`.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.runner = self.runner.with_timeout(secs);
        self
    }

    /// Use a custom runner (cancellation, timeout).
    pub fn with_runner(mut self, runner: FfmpegRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_encoding(mut self, encoding: SegmentEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    fn extract_command(&self, input: &Path, range: &CutRange, output: &Path) -> FfmpegCommand {
        FfmpegCommand::new(input, output)
            .seek(range.start)
            .duration(range.duration)
            .video_codec(&self.encoding.video_codec)
            .preset(&self.encoding.preset)
            .crf(self.encoding.crf)
            .audio_codec(&self.encoding.audio_codec)
            .audio_bitrate(&self.encoding.audio_bitrate)
            .output_args(["-avoid_negative_ts", "make_zero"])
    }
}

/// Render a concat demuxer list for `inputs`.
///
/// Paths are written absolute when possible; relative entries would be
/// resolved against the list file's directory.
pub fn concat_list(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| {
            let path = std::path::absolute(p).unwrap_or_else(|_| p.clone());
            format!("file '{}'\n", path.display().to_string().replace('\'', r"'\''"))
        })
        .collect()
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn detect_silence(&self, input: &Path, params: &DetectionParams) -> MediaResult<String> {
        if !input.exists() {
            return Err(MediaError::FileNotFound(input.to_path_buf()));
        }

        // silencedetect reports at info level
        let cmd = FfmpegCommand::new(input, "-")
            .no_video()
            .audio_filter(params.filter())
            .format("null")
            .log_level("info");

        let output = self.runner.run(&cmd).await?;
        Ok(output.report())
    }

    async fn extract_range(
        &self,
        input: &Path,
        range: &CutRange,
        output: &Path,
    ) -> MediaResult<()> {
        ensure_parent_dir(output).await?;

        debug!(
            index = range.index,
            start_sec = range.start,
            duration_sec = range.duration,
            output = %output.display(),
            "Extracting segment"
        );

        self.runner
            .run(&self.extract_command(input, range, output))
            .await?;
        Ok(())
    }

    async fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        on_progress: ProgressCallback,
    ) -> MediaResult<()> {
        ensure_parent_dir(output).await?;

        let list_path = output.with_extension("concat.txt");
        tokio::fs::write(&list_path, concat_list(inputs)).await?;

        info!(
            segments = inputs.len(),
            output = %output.display(),
            "Concatenating segments"
        );

        let cmd = FfmpegCommand::new(&list_path, output)
            .input_args(["-f", "concat", "-safe", "0"])
            .codec_copy()
            .output_args(["-movflags", "+faststart"]);

        let result = self.runner.run_with_progress(&cmd, on_progress).await;

        let _ = tokio::fs::remove_file(&list_path).await;

        result.map(|_| ())
    }

    async fn probe_duration(&self, path: &Path) -> MediaResult<Option<f64>> {
        Ok(Some(probe_media(path).await?.duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command_args() {
        let engine = FfmpegEngine::new();
        let range = CutRange {
            index: 0,
            start: 1.70011,
            duration: 4.85386,
        };
        let args = engine
            .extract_command(
                Path::new("resources/original.mp4"),
                &range,
                Path::new("resources/output1.mp4"),
            )
            .build_args();

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[ss + 1], "1.700110");
        assert_eq!(args[t + 1], "4.853860");
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"aac".to_string()));
        assert_eq!(args.last().unwrap(), "resources/output1.mp4");
    }

    #[test]
    fn test_concat_list_preserves_order() {
        let list = concat_list(&[
            PathBuf::from("/work/output1.mp4"),
            PathBuf::from("/work/output2.mp4"),
            PathBuf::from("/work/output10.mp4"),
        ]);
        assert_eq!(
            list,
            "file '/work/output1.mp4'\nfile '/work/output2.mp4'\nfile '/work/output10.mp4'\n"
        );
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = concat_list(&[PathBuf::from("/work/it's.mp4")]);
        assert_eq!(list, "file '/work/it'\\''s.mp4'\n");
    }

    #[tokio::test]
    async fn test_detect_missing_file() {
        let engine = FfmpegEngine::new();
        let result = engine
            .detect_silence(Path::new("/nonexistent/original.mp4"), &DetectionParams::default())
            .await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_detect_survives_non_utf8_banner() {
        use crate::silence_removal::parse_silence_report;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("original.mp4");
        std::fs::write(&input, b"").unwrap();

        let ffmpeg = dir.path().join("ffmpeg");
        std::fs::write(
            &ffmpeg,
            r#"#!/bin/sh
printf "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'caf\351.mp4':\n" >&2
printf '    title           : R\351union\n' >&2
printf '[silencedetect @ 0x55d] silence_start: 0\n' >&2
printf '[silencedetect @ 0x55d] silence_end: 1.80011 | silence_duration: 1.80011\n' >&2
printf '[silencedetect @ 0x55d] silence_start: 6.85397\n' >&2
printf '[silencedetect @ 0x55d] silence_end: 7.05397 | silence_duration: 0.2\n' >&2
"#,
        )
        .unwrap();
        std::fs::set_permissions(&ffmpeg, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = FfmpegEngine::new().with_runner(FfmpegRunner::new().with_binary(ffmpeg));
        let report = engine
            .detect_silence(&input, &DetectionParams::default())
            .await
            .unwrap();

        let events = parse_silence_report(&report).unwrap();
        assert_eq!(events.len(), 2);
        assert!((events[1].silence_end - 7.05397).abs() < 1e-9);
    }
}
