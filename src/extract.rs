//! Cropping a polygon's region and mask out of a source image and writing
//! both to disk.
//!
//! # Output Layout
//!
//! For a source image `dir/photo.png` and label `leaf`, a polygon whose
//! bounding box starts at `(x1, y1)` produces:
//!
//! - `dir/leaf/photo_{x1},{y1}.png` (the cropped region)
//! - `dir/leaf/photo_{x1},{y1}_mask.png` (the cropped 0/255 mask)
//!
//! Names depend only on the image name and the box origin, so extracting the
//! same box twice overwrites the earlier files.

use std::fs;
use std::path::{Component, Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use crate::error::PolysnipError;
use crate::geom::{BoundingBox, Point};
use crate::raster::{self, Mask};

/// Suffix appended to the region stem for the mask file.
pub const MASK_SUFFIX: &str = "_mask";

/// The files written by one extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedRegion {
    pub region_path: PathBuf,
    pub mask_path: PathBuf,
    /// The box actually cropped, after clamping to the image.
    pub bbox: BoundingBox,
}

/// Decodes an image from disk.
pub fn open_image(path: &Path) -> Result<DynamicImage, PolysnipError> {
    image::open(path).map_err(|source| PolysnipError::ImageRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Derives the region and mask file names for a box on `image_file_name`.
///
/// The stem is everything before the last `.`; both stem and extension must
/// be non-empty.
///
/// # Example
/// ```
/// use polysnip::extract::output_names;
/// use polysnip::geom::BoundingBox;
///
/// let (region, mask) = output_names("scan.v2.png", BoundingBox::new(10, 20, 50, 60))?;
/// assert_eq!(region, "scan.v2_10,20.png");
/// assert_eq!(mask, "scan.v2_10,20_mask.png");
/// # Ok::<(), polysnip::PolysnipError>(())
/// ```
pub fn output_names(
    image_file_name: &str,
    bbox: BoundingBox,
) -> Result<(String, String), PolysnipError> {
    let (stem, ext) = split_extension(image_file_name)?;
    let base = format!("{}_{},{}", stem, bbox.x1, bbox.y1);
    Ok((
        format!("{}.{}", base, ext),
        format!("{}{}.{}", base, MASK_SUFFIX, ext),
    ))
}

/// Crops `image` and `mask` to `bbox` and writes both under
/// `<image dir>/<label>/`.
///
/// `mask` must be the full-image mask produced by [`raster::rasterize`];
/// `bbox` is clamped to the image before cropping.
///
/// # Errors
/// - [`PolysnipError::EmptyLabel`] if `label` is blank. Nothing is created.
/// - [`PolysnipError::InvalidLabel`] if `label` is not a single plain
///   directory name (`.`, `..`, separators, absolute paths). Nothing is created.
/// - [`PolysnipError::OutputDir`] / [`PolysnipError::ImageWrite`] on write
///   failure. A region file written before a failed mask write is left in place.
pub fn extract(
    image: &DynamicImage,
    mask: &Mask,
    bbox: BoundingBox,
    base_path: &Path,
    label: &str,
) -> Result<ExtractedRegion, PolysnipError> {
    let label = output_label(label)?;

    let file_name = base_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PolysnipError::UnsupportedImageFormat(base_path.display().to_string()))?;
    let (_, ext) = split_extension(file_name)?;
    let format = ImageFormat::from_extension(ext)
        .ok_or_else(|| PolysnipError::UnsupportedImageFormat(ext.to_string()))?;

    let crop_box = bbox
        .clamp_to(
            image.width().min(mask.width()),
            image.height().min(mask.height()),
        )
        .ok_or(PolysnipError::RegionOutsideImage(bbox))?;
    let (region_name, mask_name) = output_names(file_name, crop_box)?;

    let output_dir = base_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(label);
    fs::create_dir_all(&output_dir).map_err(|source| PolysnipError::OutputDir {
        path: output_dir.clone(),
        source,
    })?;

    let region_path = output_dir.join(region_name);
    let mask_path = output_dir.join(mask_name);

    let region = image.crop_imm(
        crop_box.x1 as u32,
        crop_box.y1 as u32,
        crop_box.width() as u32,
        crop_box.height() as u32,
    );
    region
        .save_with_format(&region_path, format)
        .map_err(|source| PolysnipError::ImageWrite {
            path: region_path.clone(),
            source,
        })?;

    mask.crop(crop_box)
        .as_image()
        .save_with_format(&mask_path, format)
        .map_err(|source| PolysnipError::ImageWrite {
            path: mask_path.clone(),
            source,
        })?;

    log::info!(
        "extracted {} ({} px) from {} into {}",
        crop_box,
        crop_box.area(),
        file_name,
        output_dir.display()
    );

    Ok(ExtractedRegion {
        region_path,
        mask_path,
        bbox: crop_box,
    })
}

/// Rasterizes `points` over `image` and extracts the result.
pub fn extract_polygon(
    image: &DynamicImage,
    points: &[Point],
    base_path: &Path,
    label: &str,
) -> Result<ExtractedRegion, PolysnipError> {
    let bbox = raster::bounding_box(points)?;
    output_label(label)?;
    let mask = raster::rasterize(points, image.width(), image.height())?;
    extract(image, &mask, bbox, base_path, label)
}

/// Trims `label` and checks it names exactly one subdirectory.
fn output_label(label: &str) -> Result<&str, PolysnipError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(PolysnipError::EmptyLabel);
    }
    let mut components = Path::new(label).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(label),
        _ => Err(PolysnipError::InvalidLabel(label.to_string())),
    }
}

fn split_extension(file_name: &str) -> Result<(&str, &str), PolysnipError> {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Ok((stem, ext)),
        _ => Err(PolysnipError::UnsupportedImageFormat(format!(
            "'{}' has no file extension",
            file_name
        ))),
    }
}
