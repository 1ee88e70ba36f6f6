//! The editing session and its command dispatcher.
//!
//! A GUI shell turns each mouse or keyboard action into one [`Command`] and
//! hands it to [`dispatch`]. All state the shell would otherwise keep in
//! globals (the traced polygon, the grabbed handle, the pan offset, the open
//! image and the loaded catalog) lives in one [`Session`].
//!
//! Recoverable conditions are reported as outcomes, not errors: committing an
//! incomplete polygon yields [`Outcome::CommitDeclined`] and dragging a stale
//! handle yields [`Outcome::Ignored`]. Everything else that fails is returned
//! as an error and leaves the session as it was.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::catalog::{self, Catalog, Region};
use crate::error::PolysnipError;
use crate::extract::{self, ExtractedRegion};
use crate::geom::{BoundingBox, Device, HandleId, Point};
use crate::points::PointSet;
use crate::raster::{self, Mask};
use crate::view::{hit_test, ViewOffset, DEFAULT_HANDLE_RADIUS};

/// Options for session behavior.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Half the side length of the square used to grab a handle.
    pub handle_radius: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            handle_radius: DEFAULT_HANDLE_RADIUS,
        }
    }
}

/// One user action. Positions are raw device coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Decode an image and make it the extraction source.
    OpenImage(PathBuf),
    /// Place a new vertex.
    AddPoint { x: f64, y: f64 },
    /// Press on the canvas, grabbing the handle under the cursor if any.
    Grab { x: f64, y: f64 },
    /// Move the grabbed handle.
    Drag { x: f64, y: f64 },
    /// Drop the grabbed handle at its final position.
    Release { x: f64, y: f64 },
    /// Scroll the viewport.
    Pan { dx: f64, dy: f64 },
    /// Set the output subdirectory name.
    SetLabel(String),
    /// Extract the traced polygon.
    Commit,
    /// Discard the traced polygon.
    Clear,
    /// Load a catalog file, replacing any previous one.
    LoadCatalog(PathBuf),
    /// Open one of the loaded catalog's images for review.
    SelectImage(String),
    /// Extract a region of the selected catalog image.
    ExtractCatalogRegion { index: usize },
}

/// What a command did.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    ImageOpened { width: u32, height: u32 },
    PointAdded(HandleId),
    /// `None` when the press hit no handle.
    Grabbed(Option<HandleId>),
    HandleMoved(HandleId),
    Released(HandleId),
    Panned(ViewOffset),
    LabelSet,
    Extracted(ExtractedRegion),
    /// The polygon had too few vertices; nothing was written.
    CommitDeclined { points: usize },
    Cleared,
    CatalogLoaded { images: usize, regions: usize },
    ImageSelected { regions: usize },
    /// The command had nothing to act on.
    Ignored,
}

/// A loaded source image.
#[derive(Clone, Debug)]
pub struct OpenImage {
    pub path: PathBuf,
    pub image: DynamicImage,
}

impl OpenImage {
    /// Returns the file name used to key catalog entries and name outputs.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A catalog together with the directory its image keys resolve against.
#[derive(Clone, Debug)]
pub struct LoadedCatalog {
    pub path: PathBuf,
    pub base_dir: PathBuf,
    pub catalog: Catalog,
}

/// All state of one editing session.
#[derive(Debug, Default)]
pub struct Session {
    options: SessionOptions,
    points: PointSet,
    selected: Option<HandleId>,
    offset: ViewOffset,
    label: String,
    image: Option<OpenImage>,
    catalog: Option<LoadedCatalog>,
    selected_image: Option<String>,
    committed: Catalog,
}

impl Session {
    /// Creates a session with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with the given options.
    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn selected_handle(&self) -> Option<HandleId> {
        self.selected
    }

    pub fn view_offset(&self) -> ViewOffset {
        self.offset
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn image(&self) -> Option<&OpenImage> {
        self.image.as_ref()
    }

    pub fn catalog(&self) -> Option<&LoadedCatalog> {
        self.catalog.as_ref()
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.selected_image.as_deref()
    }

    /// Returns the regions of the selected catalog image, for preview.
    pub fn selected_regions(&self) -> &[Region] {
        match (&self.catalog, &self.selected_image) {
            (Some(loaded), Some(name)) => loaded.catalog.regions(name).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Returns every polygon committed so far, keyed by image file name.
    pub fn committed_catalog(&self) -> &Catalog {
        &self.committed
    }

    /// Returns the full-image mask of the traced polygon, for preview.
    pub fn preview_mask(&self) -> Result<Mask, PolysnipError> {
        let image = self.image.as_ref().ok_or(PolysnipError::NoImageLoaded)?;
        raster::rasterize(
            &self.points.snapshot(),
            image.image.width(),
            image.image.height(),
        )
    }

    /// Returns the bounding box of the traced polygon, for preview.
    pub fn preview_bbox(&self) -> Result<BoundingBox, PolysnipError> {
        raster::bounding_box(&self.points.snapshot())
    }

    fn image_point(&self, device: Point<Device>) -> Point {
        self.offset.to_image(device)
    }

    fn reset_polygon(&mut self) {
        self.points.clear();
        self.selected = None;
    }

    fn open_image(&mut self, path: &Path) -> Result<Outcome, PolysnipError> {
        let image = extract::open_image(path)?;
        let (width, height) = (image.width(), image.height());
        self.image = Some(OpenImage {
            path: path.to_path_buf(),
            image,
        });
        self.reset_polygon();
        log::info!("opened {} ({}x{})", path.display(), width, height);
        Ok(Outcome::ImageOpened { width, height })
    }

    fn move_selected(&mut self, x: f64, y: f64) -> Result<Option<HandleId>, PolysnipError> {
        let Some(id) = self.selected else {
            return Ok(None);
        };
        let device = Point::<Device>::new(x, y);
        if !device.is_finite() {
            log::warn!("ignoring non-finite drag position ({}, {})", x, y);
            return Ok(None);
        }
        let point = self.image_point(device);
        match self.points.move_handle(id, point) {
            Ok(()) => Ok(Some(id)),
            Err(PolysnipError::UnknownHandle(stale)) => {
                log::debug!("ignoring stale handle {}", stale);
                self.selected = None;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn commit(&mut self) -> Result<Outcome, PolysnipError> {
        let open = self.image.as_ref().ok_or(PolysnipError::NoImageLoaded)?;
        let points = self.points.snapshot();
        if !self.points.is_complete() {
            log::debug!("commit declined: {} point(s)", points.len());
            return Ok(Outcome::CommitDeclined {
                points: points.len(),
            });
        }

        let extracted = extract::extract_polygon(&open.image, &points, &open.path, &self.label)?;
        let image_name = open.file_name();
        self.committed.push_region(
            &image_name,
            Region {
                label: self.label.trim().to_string(),
                points,
            },
        );
        self.reset_polygon();
        Ok(Outcome::Extracted(extracted))
    }

    fn load_catalog(&mut self, path: &Path) -> Result<Outcome, PolysnipError> {
        let parsed = catalog::read_catalog(path)?;
        let base_dir = catalog::catalog_dir(path);
        let base_dir = std::path::absolute(&base_dir).unwrap_or(base_dir);
        let outcome = Outcome::CatalogLoaded {
            images: parsed.len(),
            regions: parsed.region_count(),
        };
        log::info!(
            "loaded catalog {} ({} image(s), {} region(s))",
            path.display(),
            parsed.len(),
            parsed.region_count()
        );
        self.catalog = Some(LoadedCatalog {
            path: path.to_path_buf(),
            base_dir,
            catalog: parsed,
        });
        self.selected_image = None;
        Ok(outcome)
    }

    fn select_image(&mut self, name: &str) -> Result<Outcome, PolysnipError> {
        let loaded = self.catalog.as_ref().ok_or(PolysnipError::NoCatalogLoaded)?;
        let regions = loaded
            .catalog
            .regions(name)
            .ok_or_else(|| PolysnipError::UnknownCatalogImage(name.to_string()))?
            .len();
        let path = loaded.base_dir.join(name);
        self.open_image(&path)?;
        self.selected_image = Some(name.to_string());
        Ok(Outcome::ImageSelected { regions })
    }

    fn extract_catalog_region(&self, index: usize) -> Result<Outcome, PolysnipError> {
        let name = self
            .selected_image
            .as_deref()
            .ok_or(PolysnipError::NoImageSelected)?;
        let region = self
            .selected_regions()
            .get(index)
            .ok_or_else(|| PolysnipError::UnknownRegion {
                image: name.to_string(),
                index,
            })?;
        let open = self.image.as_ref().ok_or(PolysnipError::NoImageLoaded)?;
        let extracted =
            extract::extract_polygon(&open.image, &region.points, &open.path, &region.label)?;
        Ok(Outcome::Extracted(extracted))
    }
}

/// Applies one command to the session.
pub fn dispatch(session: &mut Session, command: Command) -> Result<Outcome, PolysnipError> {
    match command {
        Command::OpenImage(path) => {
            let outcome = session.open_image(&path)?;
            session.selected_image = None;
            Ok(outcome)
        }
        Command::AddPoint { x, y } => {
            if session.image.is_none() {
                return Err(PolysnipError::NoImageLoaded);
            }
            let device = Point::<Device>::new(x, y);
            if !device.is_finite() {
                log::warn!("ignoring non-finite point ({}, {})", x, y);
                return Ok(Outcome::Ignored);
            }
            let point = session.image_point(device);
            Ok(Outcome::PointAdded(session.points.add(point)))
        }
        Command::Grab { x, y } => {
            let point = session.image_point(Point::new(x, y));
            session.selected = hit_test(
                point,
                session.points.handles(),
                session.options.handle_radius,
            );
            Ok(Outcome::Grabbed(session.selected))
        }
        Command::Drag { x, y } => Ok(match session.move_selected(x, y)? {
            Some(id) => Outcome::HandleMoved(id),
            None => Outcome::Ignored,
        }),
        Command::Release { x, y } => {
            let moved = session.move_selected(x, y)?;
            session.selected = None;
            Ok(match moved {
                Some(id) => Outcome::Released(id),
                None => Outcome::Ignored,
            })
        }
        Command::Pan { dx, dy } => {
            session.offset.pan(dx, dy);
            Ok(Outcome::Panned(session.offset))
        }
        Command::SetLabel(label) => {
            session.label = label;
            Ok(Outcome::LabelSet)
        }
        Command::Commit => session.commit(),
        Command::Clear => {
            session.reset_polygon();
            Ok(Outcome::Cleared)
        }
        Command::LoadCatalog(path) => session.load_catalog(&path),
        Command::SelectImage(name) => session.select_image(&name),
        Command::ExtractCatalogRegion { index } => session.extract_catalog_region(index),
    }
}
