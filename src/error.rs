use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::geom::{BoundingBox, HandleId};

/// The main error type for polysnip operations.
#[derive(Debug, Error)]
pub enum PolysnipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polygon needs at least 3 points, found {count}")]
    InsufficientPoints { count: usize },

    #[error("Unknown handle {0}")]
    UnknownHandle(HandleId),

    #[error("No output label given; refusing to write into the image directory")]
    EmptyLabel,

    #[error("Output label '{0}' must name a single subdirectory")]
    InvalidLabel(String),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Region {0} does not overlap the image")]
    RegionOutsideImage(BoundingBox),

    #[error("Malformed catalog at {context}: {message}")]
    MalformedCatalog {
        context: CatalogContext,
        message: String,
    },

    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create catalog file {path}: {source}")]
    CatalogCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write catalog to {path}: {source}")]
    CatalogWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No image is open")]
    NoImageLoaded,

    #[error("No catalog is loaded")]
    NoCatalogLoaded,

    #[error("No catalog image is selected")]
    NoImageSelected,

    #[error("Catalog has no image named '{0}'")]
    UnknownCatalogImage(String),

    #[error("Catalog image '{image}' has no region at index {index}")]
    UnknownRegion { image: String, index: usize },
}

impl PolysnipError {
    /// Returns true for failures while persisting extraction output.
    ///
    /// Files already written by the same extraction are left in place.
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            PolysnipError::Io(_) | PolysnipError::OutputDir { .. } | PolysnipError::ImageWrite { .. }
        )
    }

    pub(crate) fn malformed(context: CatalogContext, message: impl Into<String>) -> Self {
        PolysnipError::MalformedCatalog {
            context,
            message: message.into(),
        }
    }
}

/// Where in a catalog document a problem was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogContext {
    /// The document as a whole.
    Document,
    /// An image entry, by key.
    Image { image: String },
    /// A region entry, by image key and position in the image's list.
    Region { image: String, index: usize },
    /// A point entry within a region.
    Point {
        image: String,
        region: usize,
        index: usize,
    },
}

impl fmt::Display for CatalogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogContext::Document => write!(f, "document"),
            CatalogContext::Image { image } => write!(f, "image '{}'", image),
            CatalogContext::Region { image, index } => {
                write!(f, "image '{}' region {}", image, index)
            }
            CatalogContext::Point {
                image,
                region,
                index,
            } => write!(f, "image '{}' region {} point {}", image, region, index),
        }
    }
}
