//! Page annotation documents produced by the upstream detection service.
//!
//! One JSON document per page. Only `texts`, `is_essential_text` and `panels` drive the
//! redaction stages; the OCR/association fields feed transcript generation and may be absent.

use std::path::Path;

use crate::foundation::core::PixelRect;
use crate::foundation::error::{ReelError, ReelResult};

/// A detected text region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextBox {
    pub rect: PixelRect,
    pub essential: bool,
    /// Position in the original detection list.
    pub ordinal: usize,
}

/// A panel crop region; panels are visited in forward order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelBox {
    pub rect: PixelRect,
    pub ordinal: usize,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageAnnotation {
    pub texts: Vec<[f64; 4]>,
    pub is_essential_text: Vec<bool>,
    pub panels: Vec<[f64; 4]>,
    /// OCR transcription aligned with `texts`.
    #[serde(default)]
    pub ocr: Vec<String>,
    #[serde(default)]
    pub character_names: Vec<String>,
    /// `[text_index, character_index]` pairs.
    #[serde(default)]
    pub text_character_associations: Vec<[usize; 2]>,
}

/// Whether `path` names an annotation file (`.json`, any letter case).
pub fn is_annotation_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

impl PageAnnotation {
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReelError::annotation(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
            .map_err(|e| ReelError::annotation(format!("'{}': {e}", path.display())))
    }

    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let ann: Self =
            serde_json::from_str(s).map_err(|e| ReelError::annotation(format!("{e}")))?;
        ann.validate()?;
        Ok(ann)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.texts.len() != self.is_essential_text.len() {
            return Err(ReelError::annotation(format!(
                "texts ({}) and is_essential_text ({}) must have the same length",
                self.texts.len(),
                self.is_essential_text.len()
            )));
        }
        if !self.ocr.is_empty() && self.ocr.len() != self.texts.len() {
            return Err(ReelError::annotation(format!(
                "ocr ({}) must be empty or align with texts ({})",
                self.ocr.len(),
                self.texts.len()
            )));
        }
        for &[text_idx, char_idx] in &self.text_character_associations {
            if text_idx >= self.texts.len() || char_idx >= self.character_names.len() {
                return Err(ReelError::annotation(format!(
                    "association [{text_idx}, {char_idx}] is out of range"
                )));
            }
        }
        Ok(())
    }

    /// Every detected text box in detection order.
    pub fn text_boxes(&self) -> ReelResult<Vec<TextBox>> {
        self.texts
            .iter()
            .zip(&self.is_essential_text)
            .enumerate()
            .map(|(ordinal, (coords, &essential))| {
                Ok(TextBox {
                    rect: PixelRect::from_f64(*coords)?,
                    essential,
                    ordinal,
                })
            })
            .collect()
    }

    /// The essential subsequence of [`Self::text_boxes`], relative order preserved.
    pub fn essential_text_boxes(&self) -> ReelResult<Vec<TextBox>> {
        Ok(self
            .text_boxes()?
            .into_iter()
            .filter(|b| b.essential)
            .collect())
    }

    pub fn panel_boxes(&self) -> ReelResult<Vec<PanelBox>> {
        self.panels
            .iter()
            .enumerate()
            .map(|(ordinal, coords)| {
                Ok(PanelBox {
                    rect: PixelRect::from_f64(*coords)?,
                    ordinal,
                })
            })
            .collect()
    }

    /// Speaker name for the text at `text_idx`, if the detector associated one.
    pub fn speaker_for(&self, text_idx: usize) -> Option<&str> {
        self.text_character_associations
            .iter()
            .find(|[t, _]| *t == text_idx)
            .and_then(|[_, c]| self.character_names.get(*c))
            .map(String::as_str)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/annotation/mod.rs"]
mod tests;
