#![allow(dead_code)]

use polysnip::geom::Point;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub const CANVAS: u32 = 128;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A lattice point on the test canvas.
pub fn arb_lattice_point() -> impl Strategy<Value = Point> {
    (0i32..CANVAS as i32, 0i32..CANVAS as i32).prop_map(|(x, y)| Point::new(x as f64, y as f64))
}

/// Any point, possibly fractional and possibly off the canvas.
pub fn arb_point() -> impl Strategy<Value = Point> {
    (-32.0f64..160.0, -32.0f64..160.0).prop_map(|(x, y)| Point::new(x, y))
}

/// A polygon of 3..max vertices in arbitrary (possibly self-intersecting) order.
pub fn arb_polygon(max: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(arb_point(), 3..max)
}

/// A lattice triangle with non-zero area.
pub fn arb_lattice_triangle() -> impl Strategy<Value = [Point; 3]> {
    (arb_lattice_point(), arb_lattice_point(), arb_lattice_point())
        .prop_filter("triangle must have area", |(a, b, c)| {
            twice_area(&[*a, *b, *c]) != 0
        })
        .prop_map(|(a, b, c)| [a, b, c])
}

/// Twice the signed area of a lattice polygon (shoelace formula).
pub fn twice_area(points: &[Point]) -> i64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum()
}

/// Number of lattice points on the boundary of a lattice polygon.
pub fn boundary_lattice_points(points: &[Point]) -> i64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            gcd((b.x - a.x).abs() as i64, (b.y - a.y).abs() as i64)
        })
        .sum()
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
