//! Batch driver: pairs page images with annotation documents and writes every redaction
//! variant to the output directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::annotation::{PageAnnotation, is_annotation_path};
use crate::foundation::config::{PipelineConfig, RedactionMode};
use crate::foundation::core::FrameKey;
use crate::foundation::error::{ReelError, ReelResult};
use crate::naming::{NameFormat, is_image_path, list_files_sorted, nuke_images};
use crate::panel::extract_each;
use crate::redact::redact_each;

/// One page image matched with its annotation document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagePair {
    pub page: u32,
    pub image: PathBuf,
    pub annotation: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageReport {
    pub page: u32,
    pub variants: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct PageFailure {
    pub image: PathBuf,
    pub error: ReelError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub pages: Vec<PageReport>,
    pub failures: Vec<PageFailure>,
    /// Images or annotations with no counterpart.
    pub unpaired: Vec<PathBuf>,
    /// Stale images removed before the run.
    pub nuked: usize,
}

impl BatchReport {
    pub fn variants_written(&self) -> usize {
        self.pages.iter().map(|p| p.variants.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.unpaired.is_empty()
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Match images and `.json` annotations by file stem, in natural order of the images.
pub fn pair_pages(
    images_dir: &Path,
    annotations_dir: &Path,
) -> ReelResult<(Vec<PagePair>, Vec<PathBuf>)> {
    let images: Vec<PathBuf> = list_files_sorted(images_dir)?
        .into_iter()
        .filter(|p| is_image_path(p))
        .collect();
    let annotations: Vec<PathBuf> = list_files_sorted(annotations_dir)?
        .into_iter()
        .filter(|p| is_annotation_path(p))
        .collect();

    if images.len() != annotations.len() {
        tracing::warn!(
            images = images.len(),
            annotations = annotations.len(),
            "image and annotation counts differ, only matched pairs are processed"
        );
    }

    let mut by_stem: HashMap<String, PathBuf> = annotations
        .into_iter()
        .map(|p| (stem_of(&p), p))
        .collect();

    let mut pairs = Vec::new();
    let mut unpaired = Vec::new();
    for (position, image) in images.into_iter().enumerate() {
        let stem = stem_of(&image);
        let Some(annotation) = by_stem.remove(&stem) else {
            tracing::warn!(image = %image.display(), "image has no annotation, skipping");
            unpaired.push(image);
            continue;
        };
        let page = match stem.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    image = %image.display(),
                    page = position,
                    "image name is not a page number, using its position"
                );
                position as u32
            }
        };
        pairs.push(PagePair {
            page,
            image,
            annotation,
        });
    }

    let mut orphans: Vec<PathBuf> = by_stem.into_values().collect();
    orphans.sort();
    for annotation in orphans {
        tracing::warn!(annotation = %annotation.display(), "annotation has no image, skipping");
        unpaired.push(annotation);
    }
    Ok((pairs, unpaired))
}

fn save_variant(img: &RgbImage, path: &Path) -> ReelResult<()> {
    img.save(path).map_err(|e| {
        ReelError::encode(format!("failed to save variant '{}': {e}", path.display()))
    })
}

/// Delete the variants a failed page already wrote, so no partial sequence is rendered.
fn remove_partial(written: &[PathBuf]) {
    for path in written {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(
                variant = %path.display(),
                error = %e,
                "failed to remove partial variant"
            );
        }
    }
    if !written.is_empty() {
        tracing::debug!(removed = written.len(), "removed variants of failed page");
    }
}

/// Redact one page and write its variants into `out_dir`.
///
/// A page that fails leaves none of its variants behind.
///
/// Every variant keeps the source image's extension, so a page is written in a single format.
#[tracing::instrument(skip_all, fields(page = pair.page, image = %pair.image.display()))]
pub fn process_page(
    pair: &PagePair,
    out_dir: &Path,
    format: NameFormat,
    mode: RedactionMode,
) -> ReelResult<PageReport> {
    let annotation = PageAnnotation::from_path(&pair.annotation)?;
    let boxes = annotation.essential_text_boxes()?;
    let page_img = image::open(&pair.image)
        .map_err(|e| {
            ReelError::decode(format!(
                "failed to decode page '{}': {e}",
                pair.image.display()
            ))
        })?
        .to_rgb8();

    let ext = pair
        .image
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut written = Vec::new();
    let mut write = |panel: u32, bubble: u32, img: &RgbImage| -> ReelResult<()> {
        let key = FrameKey::new(pair.page, panel, bubble);
        let path = out_dir.join(format.file_name(key, &ext));
        save_variant(img, &path)?;
        written.push(path);
        Ok(())
    };

    let res = match mode {
        RedactionMode::FullPage => {
            redact_each(&page_img, &boxes, |bubble, img| write(0, bubble, img))
        }
        RedactionMode::Panels => annotation
            .panel_boxes()
            .and_then(|panels| extract_each(&page_img, &panels, &boxes, &mut write)),
    };
    if let Err(err) = res {
        remove_partial(&written);
        return Err(err);
    }

    tracing::debug!(variants = written.len(), essential = boxes.len(), "page redacted");
    Ok(PageReport {
        page: pair.page,
        variants: written,
    })
}

/// Redact every paired page from `images_dir`/`annotations_dir` into `out_dir`.
///
/// A failing page is recorded in the report and the batch moves on.
#[tracing::instrument(skip_all, fields(images = %images_dir.display(), out = %out_dir.display()))]
pub fn process_batch(
    images_dir: &Path,
    annotations_dir: &Path,
    out_dir: &Path,
    format: NameFormat,
    cfg: &PipelineConfig,
) -> ReelResult<BatchReport> {
    let mut report = BatchReport::default();
    if cfg.nuke {
        report.nuked = nuke_images(out_dir)?;
    }
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("create output directory '{}'", out_dir.display()))?;
    }

    let (pairs, unpaired) = pair_pages(images_dir, annotations_dir)?;
    report.unpaired = unpaired;

    for pair in &pairs {
        match process_page(pair, out_dir, format, cfg.mode) {
            Ok(page) => report.pages.push(page),
            Err(error) => {
                tracing::warn!(image = %pair.image.display(), %error, "page failed");
                report.failures.push(PageFailure {
                    image: pair.image.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        pages = report.pages.len(),
        failed = report.failures.len(),
        variants = report.variants_written(),
        "batch finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/mod.rs"]
mod tests;
