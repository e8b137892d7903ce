//! Audio/video multiplexing.
//!
//! The silent composition and the concatenated narration are combined by a [`Muxer`]; the
//! picture stream is copied untouched and the audio is re-encoded to AAC, trimmed to the
//! shorter of the two streams.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::audio::track::{Soundtrack, build_soundtrack};
use crate::encode::ffmpeg::{ensure_parent_dir, is_ffmpeg_on_path};
use crate::foundation::error::{ReelError, ReelResult};
use crate::plan::FramePlan;

/// File name of the intermediate soundtrack, written next to the silent video.
pub const TEMP_AUDIO_NAME: &str = "temp_audio.wav";

/// Capability to combine one video file and one audio file into `out`.
pub trait Muxer {
    fn combine(&mut self, video: &Path, audio: &Path, out: &Path) -> ReelResult<()>;
}

/// [`Muxer`] backed by the system `ffmpeg`.
#[derive(Clone, Debug, Default)]
pub struct FfmpegMuxer;

impl FfmpegMuxer {
    pub fn new() -> Self {
        Self
    }

    fn command(video: &Path, audio: &Path, out: &Path) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args(["-y", "-loglevel", "error", "-i"])
            .arg(video)
            .arg("-i")
            .arg(audio)
            .args(["-c:v", "copy", "-c:a", "aac", "-shortest"])
            .arg(out);
        cmd
    }
}

impl Muxer for FfmpegMuxer {
    fn combine(&mut self, video: &Path, audio: &Path, out: &Path) -> ReelResult<()> {
        if !is_ffmpeg_on_path() {
            return Err(ReelError::mux(
                "ffmpeg is required for muxing, but was not found on PATH",
            ));
        }
        ensure_parent_dir(out)?;

        let output = Self::command(video, audio, out).output().map_err(|e| {
            ReelError::mux(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelError::mux(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MuxOpts {
    /// Remove the silent video once the final file exists.
    pub delete_intermediates: bool,
}

impl Default for MuxOpts {
    fn default() -> Self {
        Self {
            delete_intermediates: true,
        }
    }
}

/// Result of a successful [`mux`].
#[derive(Clone, Debug, PartialEq)]
pub struct MuxOutput {
    pub path: PathBuf,
    pub soundtrack_secs: f64,
}

/// `{stem}_audio.mp4` next to `video`.
pub fn muxed_path_for(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    video.with_file_name(format!("{stem}_audio.mp4"))
}

/// Build the soundtrack for `plans`, combine it with `video`, then clean up.
///
/// On success the temporary audio is removed, and the silent video too when
/// `opts.delete_intermediates` is set. On failure both are left on disk.
#[tracing::instrument(skip_all, fields(video = %video.display(), frames = plans.len()))]
pub fn mux(
    video: &Path,
    plans: &[FramePlan],
    muxer: &mut dyn Muxer,
    opts: MuxOpts,
) -> ReelResult<MuxOutput> {
    let soundtrack: Soundtrack = build_soundtrack(plans)?;
    let audio_path = video.with_file_name(TEMP_AUDIO_NAME);
    soundtrack.write_wav(&audio_path)?;
    let mut audio_tmp = TempFileGuard(Some(audio_path.clone()));

    let out = muxed_path_for(video);
    if let Err(err) = muxer.combine(video, &audio_path, &out) {
        audio_tmp.keep();
        tracing::warn!(
            audio = %audio_path.display(),
            "muxing failed, keeping intermediate files"
        );
        return Err(err);
    }
    drop(audio_tmp);

    if opts.delete_intermediates {
        use anyhow::Context as _;
        std::fs::remove_file(video)
            .with_context(|| format!("remove silent video '{}'", video.display()))?;
    }

    tracing::info!(
        out = %out.display(),
        secs = soundtrack.duration_secs(),
        "muxed final video"
    );
    Ok(MuxOutput {
        path: out,
        soundtrack_secs: soundtrack.duration_secs(),
    })
}

struct TempFileGuard(Option<PathBuf>);

impl TempFileGuard {
    fn keep(&mut self) {
        self.0 = None;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mux/mod.rs"]
mod tests;
