//! Duration-driven composition of frame variants onto a common canvas.

use std::path::Path;

use anyhow::Context as _;
use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::config::LayoutMode;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::naming::FrameVariant;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComposeStats {
    pub canvas: Option<Canvas>,
    /// Source variants composed.
    pub variants: usize,
    /// Encoded frames written to the sink, repeats included.
    pub frames_written: u64,
    /// `frames_written / fps`.
    pub duration_secs: f64,
}

/// Largest width and largest height over every frame (independently).
pub fn canvas_for<'a>(paths: impl IntoIterator<Item = &'a Path>) -> ReelResult<Canvas> {
    let mut canvas = Canvas {
        width: 0,
        height: 0,
    };
    for path in paths {
        let (w, h) = image::image_dimensions(path).map_err(|e| {
            ReelError::decode(format!("failed to read size of '{}': {e}", path.display()))
        })?;
        canvas.width = canvas.width.max(w);
        canvas.height = canvas.height.max(h);
    }
    if canvas.width == 0 || canvas.height == 0 {
        return Err(ReelError::validation("no frames with non-zero size to compose"));
    }
    Ok(canvas)
}

/// Place `img` centered on a black canvas, unscaled (`Pad`) or uniformly fitted (`Fit`).
pub fn normalize_frame(img: &RgbImage, canvas: Canvas, layout: LayoutMode) -> RgbImage {
    let mut out = RgbImage::new(canvas.width, canvas.height);
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return out;
    }

    let fitted;
    let placed = match layout {
        LayoutMode::Pad => img,
        LayoutMode::Fit => {
            let scale = (f64::from(canvas.width) / f64::from(w))
                .min(f64::from(canvas.height) / f64::from(h));
            let new_w = ((f64::from(w) * scale) as u32).clamp(1, canvas.width);
            let new_h = ((f64::from(h) * scale) as u32).clamp(1, canvas.height);
            if (new_w, new_h) == (w, h) {
                img
            } else {
                fitted = imageops::resize(img, new_w, new_h, FilterType::Triangle);
                &fitted
            }
        }
    };

    let x = (i64::from(canvas.width) - i64::from(placed.width())).div_euclid(2);
    let y = (i64::from(canvas.height) - i64::from(placed.height())).div_euclid(2);
    imageops::replace(&mut out, placed, x, y);
    out
}

/// How many encoded frames show a variant for `secs` seconds: `round(fps × secs)`.
pub fn frame_repeat_count(fps: Fps, secs: f64) -> u64 {
    (fps.as_f64() * secs).round().max(0.0) as u64
}

/// Compose `frames` in order into `sink`, repeating each for its duration.
///
/// All frame sizes are scanned before the sink starts, so every file must already exist.
#[tracing::instrument(skip_all, fields(frames = frames.len(), fps = fps.as_f64()))]
pub fn compose(
    frames: &[FrameVariant],
    fps: Fps,
    mut duration_of: impl FnMut(usize, &FrameVariant) -> ReelResult<f64>,
    layout: LayoutMode,
    sink: &mut dyn FrameSink,
) -> ReelResult<ComposeStats> {
    if frames.is_empty() {
        return Err(ReelError::validation("no frame variants to compose"));
    }
    let canvas = canvas_for(frames.iter().map(|f| f.path.as_path()))?;
    tracing::info!(width = canvas.width, height = canvas.height, "canvas size");

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
    })?;

    let mut next = 0u64;
    for (i, variant) in frames.iter().enumerate() {
        let secs = duration_of(i, variant)?;
        let repeats = frame_repeat_count(fps, secs);

        let img = image::open(&variant.path)
            .with_context(|| format!("decode frame '{}'", variant.path.display()))?
            .to_rgb8();
        let frame = normalize_frame(&img, canvas, layout);

        tracing::debug!(frame = %variant.path.display(), secs, repeats, "compose");
        for _ in 0..repeats {
            sink.push_frame(FrameIndex(next), &frame)?;
            next += 1;
        }
    }
    sink.end()?;

    Ok(ComposeStats {
        canvas: Some(canvas),
        variants: frames.len(),
        frames_written: next,
        duration_secs: fps.frames_to_secs(next),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/mod.rs"]
mod tests;
