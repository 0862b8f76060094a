use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    foundation::error::{ScrubError, ScrubResult},
    frames::{naming::FrameNaming, source::count_consecutive_frames},
};

/// Settings for [`extract_frames`].
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// Input video file.
    pub video: PathBuf,
    /// Directory receiving the image sequence.
    pub out_dir: PathBuf,
    /// Sampling rate in frames per second.
    pub fps: u32,
    /// Output naming scheme.
    pub naming: FrameNaming,
}

impl ExtractConfig {
    /// Storefront settings: 30 fps, `frame_%04d.jpg`.
    pub fn new(video: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            video: video.into(),
            out_dir: out_dir.into(),
            fps: 30,
            naming: FrameNaming::default(),
        }
    }

    /// Reject settings ffmpeg would choke on.
    pub fn validate(&self) -> ScrubResult<()> {
        if self.fps == 0 {
            return Err(ScrubError::validation("extract fps must be non-zero"));
        }
        self.naming.validate()?;
        if !self.video.is_file() {
            return Err(ScrubError::validation(format!(
                "input video '{}' does not exist",
                self.video.display()
            )));
        }
        Ok(())
    }
}

/// Return `true` when an `ffmpeg` binary answers `-version`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> ScrubResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Sample `cfg.video` at `cfg.fps` into numbered images under `cfg.out_dir`.
///
/// Returns the number of consecutive frames present afterwards.
#[tracing::instrument(skip(cfg), fields(video = %cfg.video.display(), fps = cfg.fps))]
pub fn extract_frames(cfg: &ExtractConfig) -> ScrubResult<usize> {
    cfg.validate()?;
    if !is_ffmpeg_on_path() {
        return Err(ScrubError::validation(
            "ffmpeg is required for frame extraction, but was not found on PATH",
        ));
    }
    std::fs::create_dir_all(&cfg.out_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            cfg.out_dir.display()
        )
    })?;

    let output = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(&cfg.video)
        .args(["-vf", &format!("fps={}", cfg.fps)])
        .arg(cfg.out_dir.join(cfg.naming.ffmpeg_pattern()))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .context("failed to spawn ffmpeg")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScrubError::Other(anyhow::anyhow!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let count = count_consecutive_frames(&cfg.out_dir, &cfg.naming)?;
    if count == 0 {
        return Err(ScrubError::validation(format!(
            "ffmpeg produced no frames in '{}'",
            cfg.out_dir.display()
        )));
    }
    tracing::info!(frames = count, out_dir = %cfg.out_dir.display(), "extracted frames");
    Ok(count)
}

#[cfg(test)]
#[path = "../../tests/unit/extract/ffmpeg.rs"]
mod tests;
