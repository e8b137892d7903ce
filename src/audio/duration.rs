use std::path::{Path, PathBuf};

use crate::audio::pcm::decode_wav;
use crate::foundation::error::ReelResult;
use crate::naming::FrameVariant;

/// Where the narration clip for `variant` would live: same base name, audio extension.
pub fn audio_path_for(variant: &FrameVariant, audio_dir: &Path, audio_ext: &str) -> PathBuf {
    audio_dir.join(format!("{}.{audio_ext}", variant.base_name()))
}

/// The clip path for `variant` when one exists on disk.
pub fn find_clip(variant: &FrameVariant, audio_dir: &Path, audio_ext: &str) -> Option<PathBuf> {
    let path = audio_path_for(variant, audio_dir, audio_ext);
    path.is_file().then_some(path)
}

/// Play length of a clip in seconds, from its decoded sample count.
pub fn clip_duration_secs(path: &Path) -> ReelResult<f64> {
    Ok(decode_wav(path)?.duration_secs())
}

/// Display time of `variant`: its clip's length, or `default_secs` when it has no clip.
///
/// A clip that exists but cannot be decoded is an error, never a silent default.
pub fn resolve_duration(
    variant: &FrameVariant,
    audio_dir: &Path,
    default_secs: f64,
    audio_ext: &str,
) -> ReelResult<f64> {
    match find_clip(variant, audio_dir, audio_ext) {
        Some(path) => clip_duration_secs(&path),
        None => Ok(default_secs),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/duration.rs"]
mod tests;
