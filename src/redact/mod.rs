//! Text-bubble redaction by flat fill with the locally brightest colour.
//!
//! Speech bubbles are mostly white paper, so painting a text box with the brightest pixel found
//! inside it approximates removing the lettering. Boxes are redacted in *reverse* detection
//! order: the image saved after redacting box `i` still shows boxes `0..i`, which makes the
//! bubble index of each variant equal to the number of lines still visible.

use image::{Rgb, RgbImage};

use crate::annotation::TextBox;
use crate::foundation::core::PixelRect;
use crate::foundation::error::ReelResult;

/// One snapshot of a progressively redacted image.
#[derive(Clone, Debug)]
pub struct RedactedVariant {
    pub bubble: u32,
    pub image: RgbImage,
}

/// Brightest pixel (by `r + g + b`) inside the half-open range `[x1,x2)×[y1,y2)`.
///
/// The row at `y2` and column at `x2` are not scanned. Ties keep the first pixel found in
/// row-major order, and a range with no pixel brighter than black (including an empty or
/// fully off-image range) yields black.
pub fn brightest_color(img: &RgbImage, rect: PixelRect) -> Rgb<u8> {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let (x_lo, x_hi) = (rect.x1.max(0), rect.x2.min(w));
    let (y_lo, y_hi) = (rect.y1.max(0), rect.y2.min(h));

    let mut max_color = Rgb([0u8, 0, 0]);
    let mut max_value = 0u32;
    for y in y_lo..y_hi {
        for x in x_lo..x_hi {
            let px = *img.get_pixel(x as u32, y as u32);
            let value = px.0.iter().map(|&c| u32::from(c)).sum::<u32>();
            if value > max_value {
                max_value = value;
                max_color = px;
            }
        }
    }
    max_color
}

/// Paint `[x1,x2]×[y1,y2]` (both corners inclusive, clipped to the image) with `color`.
pub fn fill_rect(img: &mut RgbImage, rect: PixelRect, color: Rgb<u8>) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let (x_lo, x_hi) = (rect.x1.max(0), rect.x2.min(w - 1));
    let (y_lo, y_hi) = (rect.y1.max(0), rect.y2.min(h - 1));
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Redact one box on the working image and return the fill colour used.
pub fn redact_box(work: &mut RgbImage, rect: PixelRect) -> Rgb<u8> {
    let color = brightest_color(work, rect);
    if rect.is_empty() {
        tracing::debug!(?rect, "degenerate text box, filling with black");
    }
    fill_rect(work, rect, color);
    color
}

/// Stream the redaction sequence of `image` to `emit`.
///
/// `emit` first receives the pristine image with bubble index `boxes.len()`, then one image per
/// box (reverse order) with bubble index `boxes.len() - (i + 1)`.
pub fn redact_each(
    image: &RgbImage,
    boxes: &[TextBox],
    mut emit: impl FnMut(u32, &RgbImage) -> ReelResult<()>,
) -> ReelResult<()> {
    let total = boxes.len() as u32;
    let mut work = image.clone();
    emit(total, &work)?;

    for (box_index, text_box) in boxes.iter().rev().enumerate() {
        redact_box(&mut work, text_box.rect);
        emit(total - (box_index as u32 + 1), &work)?;
    }
    Ok(())
}

/// Collect the full redaction sequence as owned snapshots, in save order.
pub fn redact_sequence(image: &RgbImage, boxes: &[TextBox]) -> Vec<RedactedVariant> {
    let total = boxes.len() as u32;
    let mut work = image.clone();
    let mut out = Vec::with_capacity(boxes.len() + 1);
    out.push(RedactedVariant {
        bubble: total,
        image: work.clone(),
    });

    for (box_index, text_box) in boxes.iter().rev().enumerate() {
        redact_box(&mut work, text_box.rect);
        out.push(RedactedVariant {
            bubble: total - (box_index as u32 + 1),
            image: work.clone(),
        });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/redact/mod.rs"]
mod tests;
