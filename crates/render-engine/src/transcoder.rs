//! Transcoding seam and the ffmpeg backend.
//!
//! The render stages never build command lines themselves; they describe the
//! work as a [`ClipJob`], a concat manifest, or a [`MuxJob`] and hand it to a
//! [`Transcoder`].

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use talereel_common::config::RenderConfig;
use talereel_common::error::{TalereelError, TalereelResult};

/// Encode one still image into a clip of a fixed length.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipJob {
    /// 1-based scene index.
    pub index: usize,
    pub image: PathBuf,
    pub output: PathBuf,
    /// Exact clip length in seconds.
    pub duration: f64,
}

/// Combine the concatenated video with the narration track.
#[derive(Debug, Clone, PartialEq)]
pub struct MuxJob {
    pub video: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
    /// Hard cap on the output length in seconds.
    pub total_duration: f64,
}

/// Trait for transcoding backends.
pub trait Transcoder: Send {
    /// Render a looped still image into a clip.
    fn render_clip(&mut self, job: &ClipJob) -> TalereelResult<()>;

    /// Losslessly concatenate the clips listed in `manifest`.
    fn concat(&mut self, manifest: &Path, output: &Path) -> TalereelResult<()>;

    /// Mux video against audio, re-encoding audio only.
    fn mux(&mut self, job: &MuxJob) -> TalereelResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Shells out to the `ffmpeg` binary on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct FfmpegTranscoder {
    config: RenderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    fn run(&self, what: &str, args: Vec<String>, expected_duration_secs: f64) -> TalereelResult<()> {
        tracing::debug!(?args, "Running ffmpeg");
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-hide_banner", "-nostdin", "-progress", "pipe:1"])
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = std::time::Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| TalereelError::transcode(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TalereelError::transcode("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TalereelError::transcode("Failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently to avoid ffmpeg blocking on a full stderr pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        let mut progress = ProgressState::default();
        let mut last_advance = std::time::Instant::now();
        loop {
            line.clear();
            let bytes = reader.read_line(&mut line).map_err(|e| {
                TalereelError::transcode(format!("Failed reading ffmpeg progress: {e}"))
            })?;
            if bytes == 0 {
                break;
            }

            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let before = progress.out_time_secs;
            progress.update(key, value);
            if progress.out_time_secs > before + 0.001 {
                last_advance = std::time::Instant::now();
            }
            if key == "progress" {
                tracing::trace!(
                    what,
                    out_time_secs = progress.out_time_secs,
                    fraction = progress.fraction(expected_duration_secs),
                    "ffmpeg progress"
                );
                if last_advance.elapsed().as_secs() >= 10 {
                    tracing::warn!(
                        what,
                        out_time_secs = progress.out_time_secs,
                        elapsed_secs = start.elapsed().as_secs_f64(),
                        "No ffmpeg progress advancement for 10s"
                    );
                    last_advance = std::time::Instant::now();
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| TalereelError::transcode(format!("Failed to wait on ffmpeg: {e}")))?;

        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            return Err(TalereelError::transcode(format!(
                "ffmpeg {what} failed (status {status}): {}",
                stderr_output.trim()
            )));
        }

        tracing::debug!(
            what,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "ffmpeg finished"
        );
        Ok(())
    }
}

impl Transcoder for FfmpegTranscoder {
    fn render_clip(&mut self, job: &ClipJob) -> TalereelResult<()> {
        self.run("clip", clip_args(job, &self.config), job.duration)
    }

    fn concat(&mut self, manifest: &Path, output: &Path) -> TalereelResult<()> {
        self.run("concat", concat_args(manifest, output), 0.0)
    }

    fn mux(&mut self, job: &MuxJob) -> TalereelResult<()> {
        self.run("mux", mux_args(job, &self.config), job.total_duration)
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Hold a single image for `duration` seconds at a fixed frame rate.
pub fn clip_args(job: &ClipJob, config: &RenderConfig) -> Vec<String> {
    vec![
        "-y".into(),
        "-loop".into(),
        "1".into(),
        "-i".into(),
        path_arg(&job.image),
        "-vf".into(),
        format!("fps={}", config.fps),
        "-c:v".into(),
        config.video_codec.clone(),
        "-pix_fmt".into(),
        config.pixel_format.clone(),
        "-t".into(),
        job.duration.to_string(),
        path_arg(&job.output),
    ]
}

/// Stream-copy concatenation from a concat-demuxer manifest.
pub fn concat_args(manifest: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        path_arg(manifest),
        "-c".into(),
        "copy".into(),
        "-movflags".into(),
        "+faststart".into(),
        path_arg(output),
    ]
}

/// Copy video, re-encode audio, stop at the shorter stream and cap at the total.
pub fn mux_args(job: &MuxJob, config: &RenderConfig) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(&job.video),
        "-i".into(),
        path_arg(&job.audio),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        config.audio_codec.clone(),
        "-shortest".into(),
        "-t".into(),
        job.total_duration.to_string(),
        path_arg(&job.output),
    ]
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Whether a binary resolves on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            // ffmpeg reports microseconds under both keys.
            "out_time_ms" | "out_time_us" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }

    fn fraction(&self, expected_duration_secs: f64) -> f64 {
        if self.complete {
            1.0
        } else if expected_duration_secs <= 0.0 {
            0.0
        } else {
            (self.out_time_secs / expected_duration_secs).clamp(0.0, 1.0)
        }
    }
}
