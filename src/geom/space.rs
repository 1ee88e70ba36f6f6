//! Which grid a position was measured on.
//!
//! Input arrives in device space, relative to the top-left of the visible
//! viewport. Polygons are stored and filled in image space. The two only
//! differ by the current [`ViewOffset`](crate::view::ViewOffset).

/// Image pixel grid; (0, 0) is the top-left pixel of the source image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Image {}

/// Viewport positions as reported by the input device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Device {}
