//! Polysnip: polygon region extraction for raster images.
//!
//! Trace a closed polygon over an image, then cut out the region under it as
//! a cropped image plus a binary 0/255 mask of the same size. Polygons come
//! either from live point entry through a [`session::Session`] or from a
//! region [`catalog`] listing named polygons per image.
//!
//! # Modules
//!
//! - [`geom`]: Points, integer bounding boxes, handle identities
//! - [`points`]: The ordered, identity-keyed vertex set being edited
//! - [`view`]: Device-to-image coordinate mapping and handle hit testing
//! - [`raster`]: Bounding boxes and even-odd polygon fill masks
//! - [`extract`]: Cropping and writing region/mask pairs
//! - [`catalog`]: Parsing and writing region catalogs
//! - [`session`]: Editing session state and command dispatch
//! - [`error`]: Error types for polysnip operations

pub mod catalog;
pub mod error;
pub mod extract;
pub mod geom;
pub mod points;
pub mod raster;
pub mod session;
pub mod view;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use error::{CatalogContext, PolysnipError};

/// The polysnip CLI application.
#[derive(Parser)]
#[command(name = "polysnip")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check a region catalog for errors.
    Validate(ValidateArgs),

    /// Extract every region of a catalog to disk.
    Extract(ExtractArgs),
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Catalog file to validate.
    catalog: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the extract subcommand.
#[derive(clap::Args)]
struct ExtractArgs {
    /// Catalog file listing the regions.
    catalog: PathBuf,

    /// Only extract regions of this image.
    #[arg(long)]
    image: Option<String>,

    /// Output subdirectory (defaults to each region's label).
    #[arg(long)]
    label: Option<String>,
}

#[derive(Serialize)]
struct CatalogSummary {
    images: usize,
    regions: usize,
    points: usize,
    entries: Vec<ImageSummary>,
}

#[derive(Serialize)]
struct ImageSummary {
    image: String,
    labels: Vec<String>,
}

/// Run the polysnip CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PolysnipError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Extract(args)) => run_extract(args),
        None => {
            println!("polysnip {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Polygon region extraction for raster images.");
            println!();
            println!("Run 'polysnip --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), PolysnipError> {
    let catalog = catalog::read_catalog(&args.catalog)?;

    let summary = CatalogSummary {
        images: catalog.len(),
        regions: catalog.region_count(),
        points: catalog.point_count(),
        entries: catalog
            .iter()
            .map(|(image, regions)| ImageSummary {
                image: image.to_string(),
                labels: regions.iter().map(|r| r.label.clone()).collect(),
            })
            .collect(),
    };

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&summary).map_err(|source| {
                PolysnipError::CatalogWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        _ => {
            println!(
                "Catalog OK: {} image(s), {} region(s), {} point(s)",
                summary.images, summary.regions, summary.points
            );
            for entry in &summary.entries {
                println!("  {}: {}", entry.image, entry.labels.join(", "));
            }
        }
    }

    Ok(())
}

/// Execute the extract subcommand.
fn run_extract(args: ExtractArgs) -> Result<(), PolysnipError> {
    let catalog = catalog::read_catalog(&args.catalog)?;
    let paths = catalog::image_paths(&catalog, &catalog::catalog_dir(&args.catalog));

    if let Some(image) = &args.image {
        if catalog.regions(image).is_none() {
            return Err(PolysnipError::UnknownCatalogImage(image.clone()));
        }
    }

    let mut written = 0usize;
    for (name, regions) in catalog.iter() {
        if args.image.as_deref().is_some_and(|only| only != name) || regions.is_empty() {
            continue;
        }
        let image_path: &Path = &paths[name];
        let image = extract::open_image(image_path)?;

        for region in regions {
            let label = args.label.as_deref().unwrap_or(&region.label);
            let extracted = extract::extract_polygon(&image, &region.points, image_path, label)?;
            println!("{}", extracted.region_path.display());
            println!("{}", extracted.mask_path.display());
            written += 1;
        }
    }

    log::info!("extracted {} region(s)", written);
    Ok(())
}
