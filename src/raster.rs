//! Polygon bounding boxes and binary fill masks.
//!
//! Pixels are sampled at their integer coordinates: pixel `(x, y)` is set when
//! the point `(x, y)` lies inside the closed polygon or on its boundary.
//! Interiors use the even-odd rule, so a self-intersecting outline leaves its
//! doubly-covered lobes empty. No repair is attempted.

use image::{GrayImage, Luma};

use crate::error::PolysnipError;
use crate::geom::{BoundingBox, Point};
use crate::points::MIN_POLYGON_POINTS;

/// Mask value for pixels inside the polygon.
pub const MASK_ON: u8 = 255;

/// Mask value for pixels outside the polygon.
pub const MASK_OFF: u8 = 0;

const ON_EDGE_EPS: f64 = 1e-9;

/// A single-channel 0/255 raster.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask(GrayImage);

impl Mask {
    /// Creates an all-off mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self(GrayImage::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Returns the value at `(x, y)`, or `None` outside the mask.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.0.get_pixel_checked(x, y).map(|p| p.0[0])
    }

    /// Returns the number of on pixels.
    pub fn filled_count(&self) -> usize {
        self.0.pixels().filter(|p| p.0[0] == MASK_ON).count()
    }

    /// Returns the tight box around all on pixels, or `None` if the mask is empty.
    pub fn filled_bounds(&self) -> Option<BoundingBox> {
        let mut bounds: Option<BoundingBox> = None;
        for (x, y, p) in self.0.enumerate_pixels() {
            if p.0[0] != MASK_ON {
                continue;
            }
            let (x, y) = (x as i64, y as i64);
            bounds = Some(match bounds {
                None => BoundingBox::new(x, y, x + 1, y + 1),
                Some(b) => BoundingBox::new(b.x1.min(x), b.y1.min(y), b.x2.max(x + 1), b.y2.max(y + 1)),
            });
        }
        bounds
    }

    /// Copies out the pixels under `bbox`, which must already lie on the mask.
    pub fn crop(&self, bbox: BoundingBox) -> Mask {
        Mask(
            image::imageops::crop_imm(
                &self.0,
                bbox.x1 as u32,
                bbox.y1 as u32,
                bbox.width() as u32,
                bbox.height() as u32,
            )
            .to_image(),
        )
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.0
    }

    fn fill_span(&mut self, y: i64, from: i64, to: i64) {
        if y < 0 || y >= self.height() as i64 {
            return;
        }
        let from = from.max(0);
        let to = to.min(self.width() as i64 - 1);
        for x in from..=to {
            self.0.put_pixel(x as u32, y as u32, Luma([MASK_ON]));
        }
    }
}

/// Returns the minimal integer box enclosing the polygon.
///
/// # Errors
/// Returns [`PolysnipError::InsufficientPoints`] for fewer than 3 points.
pub fn bounding_box(points: &[Point]) -> Result<BoundingBox, PolysnipError> {
    ensure_polygon(points)?;
    BoundingBox::enclosing(points).ok_or(PolysnipError::InsufficientPoints { count: 0 })
}

/// Fills the closed polygon into a full-image mask.
///
/// Vertices connect in order and the last connects back to the first.
///
/// # Errors
/// Returns [`PolysnipError::InsufficientPoints`] for fewer than 3 points.
pub fn rasterize(points: &[Point], width: u32, height: u32) -> Result<Mask, PolysnipError> {
    ensure_polygon(points)?;
    let mut mask = Mask::new(width, height);
    if width == 0 || height == 0 {
        return Ok(mask);
    }

    let edges: Vec<(Point, Point)> = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
        .collect();

    fill_interior(&mut mask, points, &edges);
    fill_boundary(&mut mask, &edges);

    Ok(mask)
}

/// Fills `points` and panics if any on pixel falls outside the closed
/// bounding box. Non-finite vertices are skipped.
#[cfg(feature = "fuzzing")]
pub fn fuzz_rasterize(points: &[Point], width: u32, height: u32) -> Result<(), PolysnipError> {
    if !points.iter().all(Point::is_finite) {
        return Ok(());
    }
    let bbox = bounding_box(points)?;
    let mask = rasterize(points, width, height)?;
    if let Some(filled) = mask.filled_bounds() {
        assert!(filled.x1 >= bbox.x1 && filled.y1 >= bbox.y1);
        assert!(filled.x2 <= bbox.x2.saturating_add(1) && filled.y2 <= bbox.y2.saturating_add(1));
    }
    Ok(())
}

fn ensure_polygon(points: &[Point]) -> Result<(), PolysnipError> {
    if points.len() < MIN_POLYGON_POINTS {
        return Err(PolysnipError::InsufficientPoints {
            count: points.len(),
        });
    }
    Ok(())
}

/// Even-odd scanline fill. Edges are half-open in y (lower end included, upper
/// end excluded) so a vertex shared by two edges is counted once.
fn fill_interior(mask: &mut Mask, points: &[Point], edges: &[(Point, Point)]) {
    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let first_row = (min_y.ceil() as i64).max(0);
    let last_row = (max_y.floor() as i64).min(mask.height() as i64 - 1);

    let mut crossings: Vec<f64> = Vec::with_capacity(edges.len());
    for row in first_row..=last_row {
        let y = row as f64;
        crossings.clear();
        for (a, b) in edges {
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
            if y >= lo && y < hi {
                crossings.push(edge_x_at(a, b, y));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            mask.fill_span(row, pair[0].ceil() as i64, pair[1].floor() as i64);
        }
    }
}

/// Intersects the edge `a`-`b` with the row `y`, kept within the edge's x
/// range so rounding on long edges cannot overshoot.
fn edge_x_at(a: &Point, b: &Point, y: f64) -> f64 {
    let x = a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
    x.max(a.x.min(b.x)).min(a.x.max(b.x))
}

/// Sets every pixel whose sample point lies exactly on an edge.
fn fill_boundary(mask: &mut Mask, edges: &[(Point, Point)]) {
    for (a, b) in edges {
        if a.y == b.y {
            if a.y.fract() == 0.0 {
                let (lo, hi) = if a.x < b.x { (a.x, b.x) } else { (b.x, a.x) };
                mask.fill_span(a.y as i64, lo.ceil() as i64, hi.floor() as i64);
            }
            continue;
        }
        let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
        let first_row = (lo.ceil() as i64).max(0);
        let last_row = (hi.floor() as i64).min(mask.height() as i64 - 1);
        for row in first_row..=last_row {
            let y = row as f64;
            let x = edge_x_at(a, b, y);
            let column = x.round();
            if (x - column).abs() <= ON_EDGE_EPS {
                mask.fill_span(row, column as i64, column as i64);
            }
        }
    }
}
