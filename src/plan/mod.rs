//! Ordered frame plan and the render driver.
//!
//! A [`FramePlan`] list is the single index threaded through duration resolution, composition
//! and muxing: it is built once from the variants on disk and every later stage walks it in
//! the same order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::audio::duration::{find_clip, resolve_duration};
use crate::compose::{ComposeStats, compose};
use crate::encode::ffmpeg::{EncodeConfig, FfmpegEncoder};
use crate::encode::sink::FrameSink;
use crate::foundation::config::PipelineConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::mux::{MuxOpts, MuxOutput, Muxer, mux};
use crate::naming::{FrameVariant, NameFormat, list_files_sorted, list_variants};

/// One frame variant with its resolved narration.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub variant: FrameVariant,
    /// Narration clip, when one exists for the variant's base name.
    pub clip: Option<PathBuf>,
    pub duration_secs: f64,
}

/// Resolve clip and duration for every variant, keeping their order.
pub fn plan_frames(
    variants: &[FrameVariant],
    audio_dir: &Path,
    default_secs: f64,
    audio_ext: &str,
) -> ReelResult<Vec<FramePlan>> {
    let mut plans = Vec::with_capacity(variants.len());
    for variant in variants {
        let clip = find_clip(variant, audio_dir, audio_ext);
        let duration_secs = resolve_duration(variant, audio_dir, default_secs, audio_ext)?;
        plans.push(FramePlan {
            variant: variant.clone(),
            clip,
            duration_secs,
        });
    }
    warn_orphan_clips(&plans, audio_dir, audio_ext);
    Ok(plans)
}

/// Clips whose base name matches no frame are never played; surface them.
fn warn_orphan_clips(plans: &[FramePlan], audio_dir: &Path, audio_ext: &str) {
    let Ok(files) = list_files_sorted(audio_dir) else {
        tracing::debug!(dir = %audio_dir.display(), "no audio directory, every frame uses the default duration");
        return;
    };
    let names: HashSet<String> = plans.iter().map(|p| p.variant.base_name()).collect();
    for file in files {
        let matches_ext = file
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(audio_ext));
        let Some(stem) = file.file_stem().map(|s| s.to_string_lossy()) else {
            continue;
        };
        if matches_ext && !names.contains(&*stem) {
            tracing::warn!(clip = %file.display(), "narration clip matches no frame and will not be played");
        }
    }
}

/// Total planned play time.
pub fn planned_secs(plans: &[FramePlan]) -> f64 {
    plans.iter().map(|p| p.duration_secs).sum()
}

/// `video_Padding_True.mp4` / `video_Padding_False.mp4`.
pub fn silent_video_name(cfg: &PipelineConfig) -> String {
    let padding = if cfg.layout.uses_padding() { "True" } else { "False" };
    format!("video_Padding_{padding}.mp4")
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderReport {
    pub plans: Vec<FramePlan>,
    pub compose: ComposeStats,
    pub output: MuxOutput,
}

/// Plan, compose into `sink`, then mux `silent_video` with the narration.
///
/// `sink` is expected to produce `silent_video`; the driver itself never writes it.
pub fn render_into(
    frames_dir: &Path,
    audio_dir: &Path,
    silent_video: &Path,
    format: NameFormat,
    cfg: &PipelineConfig,
    sink: &mut dyn FrameSink,
    muxer: &mut dyn Muxer,
) -> ReelResult<RenderReport> {
    cfg.validate()?;
    let variants = list_variants(frames_dir, format)?;
    if variants.is_empty() {
        return Err(ReelError::validation(format!(
            "no frame variants found in '{}'",
            frames_dir.display()
        )));
    }

    let plans = plan_frames(
        &variants,
        audio_dir,
        cfg.default_duration_secs,
        &cfg.audio_extension,
    )?;
    tracing::info!(
        frames = plans.len(),
        voiced = plans.iter().filter(|p| p.clip.is_some()).count(),
        secs = planned_secs(&plans),
        "planned frame sequence"
    );

    let stats = compose(
        &variants,
        cfg.fps()?,
        |i, _| Ok(plans[i].duration_secs),
        cfg.layout,
        sink,
    )?;

    let output = mux(
        silent_video,
        &plans,
        muxer,
        MuxOpts {
            delete_intermediates: cfg.delete_intermediates,
        },
    )?;

    Ok(RenderReport {
        plans,
        compose: stats,
        output,
    })
}

/// Render `frames_dir` to `out_dir/video_Padding_{..}_audio.mp4` through ffmpeg.
#[tracing::instrument(skip_all, fields(frames = %frames_dir.display(), out = %out_dir.display()))]
pub fn render_video(
    frames_dir: &Path,
    audio_dir: &Path,
    out_dir: &Path,
    format: NameFormat,
    cfg: &PipelineConfig,
    muxer: &mut dyn Muxer,
) -> ReelResult<RenderReport> {
    let silent_video = out_dir.join(silent_video_name(cfg));
    let mut encoder = FfmpegEncoder::new(EncodeConfig::new(&silent_video));
    render_into(
        frames_dir,
        audio_dir,
        &silent_video,
        format,
        cfg,
        &mut encoder,
        muxer,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/plan/mod.rs"]
mod tests;
