//! Positions tagged with the grid they were measured on.

use std::marker::PhantomData;

use super::space::Image;

/// A position in `TSpace`, [`Image`](super::Image) unless stated otherwise.
///
/// A [`PointSet`](crate::points::PointSet) only accepts `Point<Image>`, so a
/// `Point<Device>` has to go through [`ViewOffset::to_image`](crate::view::ViewOffset::to_image)
/// before it can become a vertex.
#[derive(Clone, Copy, PartialEq)]
pub struct Point<TSpace = Image> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Point<TSpace> {
    /// Creates a point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns false if either coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<TSpace> std::fmt::Debug for Point<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Point")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}
