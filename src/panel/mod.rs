//! Per-panel crops with panel-local redaction sequences.

use image::{Rgb, RgbImage};

use crate::annotation::{PanelBox, TextBox};
use crate::foundation::core::PixelRect;
use crate::foundation::error::{ReelError, ReelResult};
use crate::redact::redact_box;

/// One redaction snapshot of one panel.
#[derive(Clone, Debug)]
pub struct PanelVariant {
    pub panel: u32,
    pub bubble: u32,
    pub image: RgbImage,
}

/// Copy `rect` out of `page` into an independent buffer; area outside the page is black.
pub fn crop_panel(page: &RgbImage, rect: PixelRect) -> ReelResult<RgbImage> {
    if rect.is_empty() {
        return Err(ReelError::annotation(format!(
            "panel {rect:?} has zero area"
        )));
    }
    let (w, h) = (
        u32::try_from(rect.width()).map_err(|_| ReelError::annotation("panel too wide"))?,
        u32::try_from(rect.height()).map_err(|_| ReelError::annotation("panel too tall"))?,
    );
    let (page_w, page_h) = (i64::from(page.width()), i64::from(page.height()));

    Ok(RgbImage::from_fn(w, h, |x, y| {
        let (sx, sy) = (rect.x1 + i64::from(x), rect.y1 + i64::from(y));
        if (0..page_w).contains(&sx) && (0..page_h).contains(&sy) {
            *page.get_pixel(sx as u32, sy as u32)
        } else {
            Rgb([0, 0, 0])
        }
    }))
}

/// A text box belongs to a panel when its center lies inside it, edges included.
pub fn is_member(panel: PixelRect, text: PixelRect) -> bool {
    let (cx, cy) = text.center();
    panel.contains_inclusive(cx, cy)
}

/// Reject panels with no area.
pub fn validate_panels(panels: &[PanelBox]) -> ReelResult<()> {
    match panels.iter().find(|p| p.rect.is_empty()) {
        Some(panel) => Err(ReelError::annotation(format!(
            "panel {} {:?} has zero area",
            panel.ordinal, panel.rect
        ))),
        None => Ok(()),
    }
}

/// Stream every panel's redaction sequence to `emit` as `(panel_index, bubble, image)`.
///
/// Bubble indices stay page-level: the pristine crop carries `boxes.len()` and the crop after
/// redacting the box at reverse position `i` carries `boxes.len() - (i + 1)`, whether or not the
/// other boxes belong to this panel.
///
/// Every panel is checked before the first emit, so a malformed panel list emits nothing.
pub fn extract_each(
    page: &RgbImage,
    panels: &[PanelBox],
    boxes: &[TextBox],
    mut emit: impl FnMut(u32, u32, &RgbImage) -> ReelResult<()>,
) -> ReelResult<()> {
    let total = boxes.len() as u32;
    validate_panels(panels)?;

    for panel in panels {
        let panel_index = panel.ordinal as u32;
        let mut work = crop_panel(page, panel.rect)?;
        emit(panel_index, total, &work)?;

        for (box_index, text_box) in boxes.iter().rev().enumerate() {
            if !is_member(panel.rect, text_box.rect) {
                continue;
            }
            let local = text_box.rect.translate(-panel.rect.x1, -panel.rect.y1);
            redact_box(&mut work, local);
            emit(panel_index, total - (box_index as u32 + 1), &work)?;
        }
    }
    Ok(())
}

/// Collect every panel's redaction sequence in save order.
pub fn extract_panels(
    page: &RgbImage,
    panels: &[PanelBox],
    boxes: &[TextBox],
) -> ReelResult<Vec<PanelVariant>> {
    let mut out = Vec::new();
    extract_each(page, panels, boxes, |panel, bubble, image| {
        out.push(PanelVariant {
            panel,
            bubble,
            image: image.clone(),
        });
        Ok(())
    })?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/panel/mod.rs"]
mod tests;
