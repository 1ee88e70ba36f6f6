//! Fuzz target for polygon rasterization.
//!
//! Interprets the input as little-endian f32 coordinate pairs and fills them
//! into a small canvas. Arbitrary vertices (including NaN and infinities) must
//! never panic, and finite polygons must never fill outside their bounding box.
//!
//! Run with:
//!   cargo +nightly fuzz run polygon_rasterize

#![no_main]

use libfuzzer_sys::fuzz_target;
use polysnip::geom::Point;
use polysnip::raster::{bounding_box, fuzz_rasterize, rasterize};

fuzz_target!(|data: &[u8]| {
    let points: Vec<Point> = data
        .chunks_exact(8)
        .take(64)
        .map(|c| {
            let x = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            let y = f32::from_le_bytes([c[4], c[5], c[6], c[7]]);
            Point::new(x as f64, y as f64)
        })
        .collect();

    let _ = bounding_box(&points);
    let _ = rasterize(&points, 64, 64);
    let _ = fuzz_rasterize(&points, 64, 64);
});
