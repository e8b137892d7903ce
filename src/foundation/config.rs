use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

/// How frames smaller than the canvas are placed on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Unscaled, centered on a black canvas.
    #[default]
    Pad,
    /// Uniformly scaled to fit, then centered (letterbox).
    Fit,
}

impl LayoutMode {
    pub fn uses_padding(self) -> bool {
        matches!(self, Self::Pad)
    }
}

/// Which image region a page's redaction sequence runs over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionMode {
    /// One sequence over the whole page, written as panel 0.
    FullPage,
    /// One sequence per annotated panel.
    #[default]
    Panels,
}

/// Run-wide settings shared by every pipeline stage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fps: u32,
    /// Display time for a frame that has no narration clip.
    pub default_duration_secs: f64,
    pub layout: LayoutMode,
    pub mode: RedactionMode,
    /// Delete stale frame images from the output directory before redacting.
    pub nuke: bool,
    /// Remove the silent video after a successful mux.
    pub delete_intermediates: bool,
    /// Extension (without dot) of narration clips. Clips are WAV, so only `wav` is accepted,
    /// in any letter case.
    pub audio_extension: String,
    pub language: String,
    pub voice_seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            default_duration_secs: 0.5,
            layout: LayoutMode::Pad,
            mode: RedactionMode::Panels,
            nuke: true,
            delete_intermediates: true,
            audio_extension: "wav".to_string(),
            language: "en".to_string(),
            voice_seed: 0,
        }
    }
}

impl PipelineConfig {
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| ReelError::serde(format!("config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.fps == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if !self.default_duration_secs.is_finite() || self.default_duration_secs <= 0.0 {
            return Err(ReelError::validation(
                "default_duration_secs must be finite and > 0",
            ));
        }
        if !self.audio_extension.eq_ignore_ascii_case("wav") {
            return Err(ReelError::validation(format!(
                "audio_extension must be \"wav\", got {:?}",
                self.audio_extension
            )));
        }
        Ok(())
    }

    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::integer(self.fps)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
