//! Integer bounding boxes on the image pixel grid.

use std::fmt;

use super::point::Point;

/// An axis-aligned bounding box in XYXY format on the pixel grid.
///
/// As a pixel range the box is half-open: it covers columns `x1..x2` and rows
/// `y1..y2`. A box built from polygon vertices keeps `x1 <= x2` and `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl BoundingBox {
    /// Creates a new bounding box from explicit corners.
    #[inline]
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns the minimal box containing every point, with the minimum
    /// floored and the maximum ceiled to whole pixels.
    ///
    /// Returns `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(
            min_x.floor() as i64,
            min_y.floor() as i64,
            max_x.ceil() as i64,
            max_y.ceil() as i64,
        ))
    }

    /// Returns the width of the box in pixels.
    #[inline]
    pub fn width(&self) -> i64 {
        self.x2.saturating_sub(self.x1)
    }

    /// Returns the height of the box in pixels.
    #[inline]
    pub fn height(&self) -> i64 {
        self.y2.saturating_sub(self.y1)
    }

    /// Returns the number of pixels covered by the box.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width().saturating_mul(self.height())
    }

    /// Returns true if the box covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Intersects the box with an image of the given dimensions.
    ///
    /// Returns `None` when nothing of the box lies on the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        let clamped = Self::new(
            self.x1.clamp(0, width as i64),
            self.y1.clamp(0, height as i64),
            self.x2.clamp(0, width as i64),
            self.y2.clamp(0, height as i64),
        );
        (!clamped.is_empty()).then_some(clamped)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}
