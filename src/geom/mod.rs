//! Geometry primitives shared by every stage of region extraction.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: Points carry a marker for their coordinate space, so a
//!    raw device position cannot be mistaken for an image pixel position.
//!
//! 2. **Pixel Grid**: Bounding boxes are integer and half-open, which makes
//!    crop dimensions equal to `x2 - x1` by `y2 - y1` with no off-by-one.
//!
//! 3. **Stable Identity**: Vertices are addressed by [`HandleId`], never by
//!    position in the polygon.
//!
//! # Example
//!
//! ```
//! use polysnip::geom::{BoundingBox, Point};
//!
//! let square = [
//!     Point::new(10.0, 10.0),
//!     Point::new(10.0, 50.0),
//!     Point::new(50.0, 50.0),
//!     Point::new(50.0, 10.0),
//! ];
//! let bbox = BoundingBox::enclosing(&square).unwrap();
//! assert_eq!((bbox.width(), bbox.height()), (40, 40));
//! ```

mod bbox;
mod handle;
mod point;
mod space;

pub use bbox::BoundingBox;
pub use handle::{Handle, HandleId};
pub use point::Point;
pub use space::{Device, Image};
