//! Region catalogs: named polygons per image, stored as JSON.
//!
//! # Catalog Format
//!
//! ```json
//! {
//!   "leaf_01.png": [
//!     {
//!       "anatomy": "petiole",
//!       "points": [
//!         {"x": 10, "y": 10, "order": 0},
//!         {"x": 50, "y": 10, "order": 1},
//!         {"x": 30, "y": 40, "order": 2}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Image keys are resolved relative to the catalog file's directory. The
//! array order of points carries no meaning: vertices are sorted by their
//! `order` value, which must be an integer unique within the region but need
//! not be contiguous.
//!
//! Parsing is all-or-nothing. The first problem found aborts with
//! [`PolysnipError::MalformedCatalog`] naming the image key and region index.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CatalogContext, PolysnipError};
use crate::geom::Point;
use crate::points::MIN_POLYGON_POINTS;

const LABEL_FIELD: &str = "anatomy";
const POINTS_FIELD: &str = "points";
const ORDER_FIELD: &str = "order";

/// One named polygon from a catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub label: String,
    /// Vertices in ascending `order`.
    pub points: Vec<Point>,
}

/// Regions grouped by image file name.
///
/// A parsed catalog is never mutated; images iterate in name order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    images: BTreeMap<String, Vec<Region>>,
}

impl Catalog {
    /// Returns the image file names in the catalog.
    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    /// Returns the regions listed for an image, in file order.
    pub fn regions(&self, image: &str) -> Option<&[Region]> {
        self.images.get(image).map(Vec::as_slice)
    }

    /// Iterates `(image name, regions)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Region])> {
        self.images
            .iter()
            .map(|(name, regions)| (name.as_str(), regions.as_slice()))
    }

    /// Returns the number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Returns the number of regions across all images.
    pub fn region_count(&self) -> usize {
        self.images.values().map(Vec::len).sum()
    }

    /// Returns the number of vertices across all regions.
    pub fn point_count(&self) -> usize {
        self.images
            .values()
            .flatten()
            .map(|r| r.points.len())
            .sum()
    }

    pub(crate) fn push_region(&mut self, image: &str, region: Region) {
        self.images
            .entry(image.to_string())
            .or_default()
            .push(region);
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Validates and converts a decoded JSON document into a catalog.
pub fn parse(raw: &Value) -> Result<Catalog, PolysnipError> {
    let object = raw.as_object().ok_or_else(|| {
        PolysnipError::malformed(
            CatalogContext::Document,
            "expected an object mapping image names to region lists",
        )
    })?;

    let mut images = BTreeMap::new();
    for (image, entry) in object {
        let list = entry.as_array().ok_or_else(|| {
            PolysnipError::malformed(
                CatalogContext::Image {
                    image: image.clone(),
                },
                "expected a list of regions",
            )
        })?;
        let regions = list
            .iter()
            .enumerate()
            .map(|(index, region)| parse_region(image, index, region))
            .collect::<Result<Vec<_>, _>>()?;
        images.insert(image.clone(), regions);
    }

    let catalog = Catalog { images };
    log::debug!(
        "parsed catalog: {} image(s), {} region(s)",
        catalog.len(),
        catalog.region_count()
    );
    Ok(catalog)
}

/// Parses a catalog from a JSON string.
pub fn from_catalog_str(json: &str) -> Result<Catalog, PolysnipError> {
    let raw: Value = serde_json::from_str(json).map_err(syntax_error)?;
    parse(&raw)
}

/// Parses a catalog from raw bytes.
///
/// Useful for fuzzing and processing raw bytes without UTF-8 validation overhead.
pub fn from_catalog_slice(bytes: &[u8]) -> Result<Catalog, PolysnipError> {
    let raw: Value = serde_json::from_slice(bytes).map_err(syntax_error)?;
    parse(&raw)
}

/// Reads and parses a catalog file.
///
/// # Errors
/// [`PolysnipError::CatalogRead`] if the file cannot be read,
/// [`PolysnipError::MalformedCatalog`] if its contents are invalid.
pub fn read_catalog(path: &Path) -> Result<Catalog, PolysnipError> {
    let bytes = fs::read(path).map_err(|source| PolysnipError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    from_catalog_slice(&bytes)
}

/// Returns the directory image keys of the catalog at `catalog_path` resolve against.
pub fn catalog_dir(catalog_path: &Path) -> PathBuf {
    match catalog_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Joins every image key onto `base_dir`. File existence is not checked.
pub fn image_paths(catalog: &Catalog, base_dir: &Path) -> BTreeMap<String, PathBuf> {
    catalog
        .image_names()
        .map(|name| (name.to_string(), base_dir.join(name)))
        .collect()
}

fn syntax_error(err: serde_json::Error) -> PolysnipError {
    PolysnipError::malformed(CatalogContext::Document, err.to_string())
}

fn parse_region(image: &str, index: usize, raw: &Value) -> Result<Region, PolysnipError> {
    let region_ctx = || CatalogContext::Region {
        image: image.to_string(),
        index,
    };

    let object = raw
        .as_object()
        .ok_or_else(|| PolysnipError::malformed(region_ctx(), "expected a region object"))?;

    let label = match object.get(LABEL_FIELD) {
        Some(Value::String(label)) => label.clone(),
        Some(_) => {
            return Err(PolysnipError::malformed(
                region_ctx(),
                format!("'{}' must be a string", LABEL_FIELD),
            ))
        }
        None => {
            return Err(PolysnipError::malformed(
                region_ctx(),
                format!("missing '{}'", LABEL_FIELD),
            ))
        }
    };

    let raw_points = match object.get(POINTS_FIELD) {
        Some(Value::Array(points)) => points,
        Some(_) => {
            return Err(PolysnipError::malformed(
                region_ctx(),
                format!("'{}' must be a list", POINTS_FIELD),
            ))
        }
        None => {
            return Err(PolysnipError::malformed(
                region_ctx(),
                format!("missing '{}'", POINTS_FIELD),
            ))
        }
    };

    let mut ordered: Vec<(i64, Point)> = Vec::with_capacity(raw_points.len());
    let mut seen = HashSet::with_capacity(raw_points.len());
    for (point_index, raw_point) in raw_points.iter().enumerate() {
        let point_ctx = CatalogContext::Point {
            image: image.to_string(),
            region: index,
            index: point_index,
        };
        let (order, point) = parse_point(point_ctx, raw_point)?;
        if !seen.insert(order) {
            return Err(PolysnipError::malformed(
                region_ctx(),
                format!("duplicate {} {}", ORDER_FIELD, order),
            ));
        }
        ordered.push((order, point));
    }

    if ordered.len() < MIN_POLYGON_POINTS {
        return Err(PolysnipError::malformed(
            region_ctx(),
            format!(
                "a region needs at least {} points, found {}",
                MIN_POLYGON_POINTS,
                ordered.len()
            ),
        ));
    }

    ordered.sort_by_key(|(order, _)| *order);

    Ok(Region {
        label,
        points: ordered.into_iter().map(|(_, p)| p).collect(),
    })
}

fn parse_point(ctx: CatalogContext, raw: &Value) -> Result<(i64, Point), PolysnipError> {
    let object = match raw.as_object() {
        Some(object) => object,
        None => return Err(PolysnipError::malformed(ctx, "expected a point object")),
    };

    let x = number_field(object, "x", &ctx)?;
    let y = number_field(object, "y", &ctx)?;
    let order = match object.get(ORDER_FIELD) {
        Some(value) => value.as_i64().ok_or_else(|| {
            PolysnipError::malformed(ctx.clone(), format!("'{}' must be an integer", ORDER_FIELD))
        })?,
        None => {
            return Err(PolysnipError::malformed(
                ctx,
                format!("missing '{}'", ORDER_FIELD),
            ))
        }
    };

    Ok((order, Point::new(x, y)))
}

fn number_field(
    object: &Map<String, Value>,
    field: &str,
    ctx: &CatalogContext,
) -> Result<f64, PolysnipError> {
    match object.get(field) {
        Some(value) => value.as_f64().ok_or_else(|| {
            PolysnipError::malformed(ctx.clone(), format!("'{}' must be a number", field))
        }),
        None => Err(PolysnipError::malformed(
            ctx.clone(),
            format!("missing '{}'", field),
        )),
    }
}

// ============================================================================
// Writing
// ============================================================================

#[derive(Serialize)]
struct RegionOut<'a> {
    anatomy: &'a str,
    points: Vec<PointOut>,
}

#[derive(Serialize)]
struct PointOut {
    x: f64,
    y: f64,
    order: usize,
}

fn catalog_to_out(catalog: &Catalog) -> BTreeMap<&str, Vec<RegionOut<'_>>> {
    catalog
        .iter()
        .map(|(image, regions)| {
            let regions = regions
                .iter()
                .map(|region| RegionOut {
                    anatomy: &region.label,
                    points: region
                        .points
                        .iter()
                        .enumerate()
                        .map(|(order, p)| PointOut {
                            x: p.x,
                            y: p.y,
                            order,
                        })
                        .collect(),
                })
                .collect();
            (image, regions)
        })
        .collect()
}

/// Writes a catalog to a JSON string, numbering each region's points from 0.
pub fn to_catalog_string(catalog: &Catalog) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&catalog_to_out(catalog))
}

/// Writes a catalog to a JSON file, numbering each region's points from 0.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<(), PolysnipError> {
    let file = File::create(path).map_err(|source| PolysnipError::CatalogCreate {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &catalog_to_out(catalog)).map_err(|source| {
        PolysnipError::CatalogWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
