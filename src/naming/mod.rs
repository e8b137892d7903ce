//! Frame variant file naming and discovery.
//!
//! Variants persist as `page_{P}_panel_{N}_bubble_{B}{ext}` with every field zero-padded to one
//! run-wide width, so a plain lexicographic listing already plays back in order. In memory the
//! authority is the parsed [`FrameKey`]; file names are only the persistence format.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context as _;
use regex::Regex;

use crate::foundation::core::FrameKey;
use crate::foundation::error::{ReelError, ReelResult};

/// Extensions (lowercase, no dot) treated as frame images for discovery and nuking.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp"];

/// Padding added on top of the digit count of the image total.
pub const DIGIT_BUFFER: usize = 2;

/// Field width for a run over `image_count` source images: `ceil(log10(n + 1)) + 2`, or `2`
/// for an empty input.
pub fn compute_digit_width(image_count: usize) -> usize {
    if image_count == 0 {
        return DIGIT_BUFFER;
    }
    // ceil(log10(n + 1)) is exactly the decimal digit count of n.
    let mut digits = 0usize;
    let mut n = image_count;
    while n > 0 {
        digits += 1;
        n /= 10;
    }
    digits + DIGIT_BUFFER
}

/// `true` when `path` has one of [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// The run's file name scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameFormat {
    width: usize,
}

impl NameFormat {
    pub fn new(width: usize) -> ReelResult<Self> {
        if width == 0 {
            return Err(ReelError::validation("name format width must be >= 1"));
        }
        Ok(Self { width })
    }

    pub fn for_image_count(image_count: usize) -> Self {
        Self {
            width: compute_digit_width(image_count),
        }
    }

    pub fn width(self) -> usize {
        self.width
    }

    /// `ext` includes its leading dot (`".jpg"`), or is empty.
    pub fn file_name(self, key: FrameKey, ext: &str) -> String {
        let w = self.width;
        format!(
            "page_{:0w$}_panel_{:0w$}_bubble_{:0w$}{ext}",
            key.page, key.panel, key.bubble
        )
    }

    /// Glob form with every numeric field (and the extension) wildcarded.
    pub fn glob_pattern(self) -> &'static str {
        "page_*_panel_*_bubble_*"
    }

    /// Parse a file name produced by [`Self::file_name`] into its key and extension.
    pub fn parse(self, file_name: &str) -> Option<(FrameKey, String)> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^page_(\d+)_panel_(\d+)_bubble_(\d+)(\.[A-Za-z0-9]+)?$")
                .expect("static frame name regex")
        });
        let caps = re.captures(file_name)?;
        let field = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };
        let key = FrameKey::new(field(1)?, field(2)?, field(3)?);
        let ext = caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default();
        Some((key, ext))
    }
}

/// A frame variant discovered on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameVariant {
    pub key: FrameKey,
    pub path: PathBuf,
    /// Including the leading dot.
    pub extension: String,
}

impl FrameVariant {
    /// File name without extension; the correlation key for narration clips.
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List frame variants in `dir` matching `format`, in playback order.
pub fn list_variants(dir: &Path, format: NameFormat) -> ReelResult<Vec<FrameVariant>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        format.glob_pattern()
    );
    let paths = glob::glob(&pattern)
        .map_err(|e| ReelError::validation(format!("invalid frame glob '{pattern}': {e}")))?;

    let mut out = Vec::new();
    for entry in paths {
        let path = entry.context("read frame directory entry")?;
        if !path.is_file() || !is_image_path(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some((key, extension)) = format.parse(name) else {
            tracing::debug!(name, "skipping file that does not follow the frame name format");
            continue;
        };
        out.push(FrameVariant {
            key,
            path,
            extension,
        });
    }

    out.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.path.cmp(&b.path)));
    Ok(out)
}

/// Count image files directly inside `dir`.
pub fn count_images(dir: &Path) -> ReelResult<usize> {
    Ok(list_files_sorted(dir)?
        .iter()
        .filter(|p| is_image_path(p))
        .count())
}

/// Delete every image file directly inside `dir`. A missing directory is not an error.
pub fn nuke_images(dir: &Path) -> ReelResult<usize> {
    if !dir.exists() {
        tracing::warn!(dir = %dir.display(), "nuke target does not exist, nothing to delete");
        return Ok(0);
    }
    let mut removed = 0usize;
    for path in list_files_sorted(dir)? {
        if is_image_path(&path) {
            std::fs::remove_file(&path)
                .with_context(|| format!("remove stale frame '{}'", path.display()))?;
            removed += 1;
        }
    }
    tracing::info!(dir = %dir.display(), removed, "deleted stale images");
    Ok(removed)
}

/// Regular files directly inside `dir`, naturally sorted by file name.
pub fn list_files_sorted(dir: &Path) -> ReelResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read entry in '{}'", dir.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| {
        let an = a.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let bn = b.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        natural_cmp(&an, &bn)
    });
    Ok(files)
}

/// Compare names with digit runs ordered numerically (`"2.png" < "10.png"`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut ac, mut bc) = (chunks(a), chunks(b));
    loop {
        match (ac.next(), bc.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (is_digits(x), is_digits(y)) {
                    (true, true) => cmp_digit_runs(x, y),
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn cmp_digit_runs(x: &str, y: &str) -> Ordering {
    let (xt, yt) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
    xt.len()
        .cmp(&yt.len())
        .then_with(|| xt.cmp(yt))
        .then_with(|| x.len().cmp(&y.len()))
}

fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(head)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/naming/mod.rs"]
mod tests;
