//! Translation between the scrolled viewport and the image pixel grid.

use crate::geom::{Device, Handle, HandleId, Point};

/// Half the side length of the square grab area around a handle.
pub const DEFAULT_HANDLE_RADIUS: f64 = 4.0;

/// Displacement of the viewport origin relative to the image origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewOffset {
    pub x: f64,
    pub y: f64,
}

impl ViewOffset {
    /// Creates a new view offset.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shifts the viewport by a pan delta.
    #[inline]
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Maps a device position into image pixel coordinates.
    ///
    /// The image is drawn shifted by `-offset`, so a device position maps
    /// back by adding `offset`.
    #[inline]
    pub fn to_image(&self, device: Point<Device>) -> Point {
        Point::new(device.x + self.x, device.y + self.y)
    }
}

/// Maps raw device coordinates into image pixel coordinates.
#[inline]
pub fn to_image_space(device_x: f64, device_y: f64, offset: ViewOffset) -> Point {
    offset.to_image(Point::new(device_x, device_y))
}

/// Finds the handle whose grab square contains `point`.
///
/// Each handle owns the axis-aligned square of half-side `radius` centred on
/// its position (edges inclusive). Candidates are searched newest first, so
/// when squares overlap the most recently placed handle wins.
pub fn hit_test(point: Point, candidates: &[Handle], radius: f64) -> Option<HandleId> {
    candidates
        .iter()
        .rev()
        .find(|h| (point.x - h.point.x).abs() <= radius && (point.y - h.point.y).abs() <= radius)
        .map(|h| h.id)
}
