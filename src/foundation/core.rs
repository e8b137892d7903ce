use crate::foundation::error::{ReelError, ReelResult};

/// Axis-aligned pixel rectangle `(x1, y1, x2, y2)` in page or panel coordinates.
///
/// Coordinates are signed so that detections hanging off the page edge survive translation
/// into panel-local space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl PixelRect {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from detector output, truncating each coordinate toward zero.
    ///
    /// Coordinates must be finite and within the `i32` range.
    pub fn from_f64(coords: [f64; 4]) -> ReelResult<Self> {
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(ReelError::annotation(format!(
                "box coordinates must be finite, got {coords:?}"
            )));
        }
        let range = f64::from(i32::MIN)..=f64::from(i32::MAX);
        if coords.iter().any(|c| !range.contains(c)) {
            return Err(ReelError::annotation(format!(
                "box coordinates out of range, got {coords:?}"
            )));
        }
        Ok(Self {
            x1: coords[0] as i64,
            y1: coords[1] as i64,
            x2: coords[2] as i64,
            y2: coords[3] as i64,
        })
    }

    pub fn width(self) -> u64 {
        self.x2.saturating_sub(self.x1).max(0) as u64
    }

    pub fn height(self) -> u64 {
        self.y2.saturating_sub(self.y1).max(0) as u64
    }

    /// `true` when the half-open scan range `[x1,x2)×[y1,y2)` holds no pixel.
    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Midpoint with floor division on both axes.
    pub fn center(self) -> (i64, i64) {
        (floor_mid(self.x1, self.x2), floor_mid(self.y1, self.y2))
    }

    /// Point membership with inclusive bounds on every edge.
    pub fn contains_inclusive(self, x: i64, y: i64) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    pub fn translate(self, dx: i64, dy: i64) -> Self {
        Self {
            x1: self.x1.saturating_add(dx),
            y1: self.y1.saturating_add(dy),
            x2: self.x2.saturating_add(dx),
            y2: self.y2.saturating_add(dy),
        }
    }
}

/// `floor((a + b) / 2)` without overflowing.
fn floor_mid(a: i64, b: i64) -> i64 {
    a.div_euclid(2) + b.div_euclid(2) + (a.rem_euclid(2) + b.rem_euclid(2)) / 2
}

/// Index of one encoded output frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Composite identity of one frame variant on disk.
///
/// Field order gives the playback order: the derived `Ord` sorts by page, then panel, then
/// bubble index.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameKey {
    pub page: u32,
    pub panel: u32,
    pub bubble: u32,
}

impl FrameKey {
    pub fn new(page: u32, panel: u32, bubble: u32) -> Self {
        Self {
            page,
            panel,
            bubble,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn integer(num: u32) -> ReelResult<Self> {
        Self::new(num, 1)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
