//! Integration tests for writing region/mask pairs to disk.

use std::fs;

use image::DynamicImage;
use polysnip::extract::{extract, extract_polygon, open_image};
use polysnip::geom::{BoundingBox, Point};
use polysnip::raster::{bounding_box, rasterize, MASK_ON};
use polysnip::PolysnipError;

mod common;
use common::{file_names, gradient_image, write_blank_png, write_png};

fn square() -> Vec<Point> {
    vec![
        Point::new(10.0, 10.0),
        Point::new(10.0, 50.0),
        Point::new(50.0, 50.0),
        Point::new(50.0, 10.0),
    ]
}

#[test]
fn square_on_blank_image_gives_solid_40x40_mask() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("blank.png");
    write_blank_png(&source, 100, 100);
    let image = open_image(&source).expect("open image");

    let extracted = extract_polygon(&image, &square(), &source, "snips").expect("extract");

    assert_eq!(extracted.bbox, BoundingBox::new(10, 10, 50, 50));
    assert_eq!(
        extracted.region_path,
        temp.path().join("snips").join("blank_10,10.png")
    );
    assert_eq!(
        extracted.mask_path,
        temp.path().join("snips").join("blank_10,10_mask.png")
    );

    let region = image::open(&extracted.region_path).expect("read region");
    assert_eq!((region.width(), region.height()), (40, 40));

    let mask = image::open(&extracted.mask_path)
        .expect("read mask")
        .to_luma8();
    assert_eq!(mask.dimensions(), (40, 40));
    assert!(mask.pixels().all(|p| p.0[0] == MASK_ON));
}

#[test]
fn region_crop_keeps_source_pixels() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("grad.png");
    write_png(&source, 64, 48);
    let image = open_image(&source).expect("open image");

    let triangle = vec![
        Point::new(20.0, 5.0),
        Point::new(40.0, 30.0),
        Point::new(12.0, 30.0),
    ];
    let extracted = extract_polygon(&image, &triangle, &source, "tri").expect("extract");

    let region = image::open(&extracted.region_path)
        .expect("read region")
        .to_rgb8();
    assert_eq!(region.dimensions(), (28, 25));
    assert_eq!(region.get_pixel(0, 0).0, [12, 5, 7]);
    assert_eq!(region.get_pixel(27, 24).0, [39, 29, 7]);

    let mask = image::open(&extracted.mask_path)
        .expect("read mask")
        .to_luma8();
    assert_eq!(mask.dimensions(), region.dimensions());
    // Apex column is on at the top row, the top-left corner is off.
    assert_eq!(mask.get_pixel(8, 0).0[0], 255);
    assert_eq!(mask.get_pixel(0, 0).0[0], 0);
    assert!(mask.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
}

#[test]
fn repeated_extraction_overwrites_same_files() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("img.png");
    write_png(&source, 100, 100);
    let image = open_image(&source).expect("open image");

    let first = extract_polygon(&image, &square(), &source, "out").expect("first extract");
    let first_bytes = fs::read(&first.region_path).expect("read first");

    let second = extract_polygon(&image, &square(), &source, "out").expect("second extract");
    assert_eq!(first, second);
    assert_eq!(fs::read(&second.region_path).expect("read second"), first_bytes);

    assert_eq!(
        file_names(&temp.path().join("out")),
        vec!["img_10,10.png", "img_10,10_mask.png"]
    );
}

#[test]
fn empty_label_writes_nothing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("img.png");
    write_png(&source, 100, 100);
    let image = open_image(&source).expect("open image");

    let err = extract_polygon(&image, &square(), &source, "").unwrap_err();

    assert!(matches!(err, PolysnipError::EmptyLabel));
    assert_eq!(file_names(temp.path()), vec!["img.png"]);
}

#[test]
fn label_must_name_a_single_subdirectory() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("img.png");
    write_png(&source, 100, 100);
    let image = open_image(&source).expect("open image");
    let elsewhere = temp.path().join("elsewhere");
    let absolute = elsewhere.to_str().expect("utf-8 temp path");

    for label in [".", "..", "a/b", absolute] {
        let err = extract_polygon(&image, &square(), &source, label).unwrap_err();
        assert!(
            matches!(err, PolysnipError::InvalidLabel(_)),
            "label {:?} gave {:?}",
            label,
            err
        );
    }

    assert_eq!(file_names(temp.path()), vec!["img.png"]);
    assert!(!elsewhere.exists());
}

#[test]
fn failed_mask_write_keeps_region_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("img.png");
    write_png(&source, 100, 100);
    fs::create_dir_all(temp.path().join("out/img_10,10_mask.png")).expect("block mask path");
    let image = open_image(&source).expect("open image");

    let err = extract_polygon(&image, &square(), &source, "out").unwrap_err();

    assert!(err.is_io_failure());
    match err {
        PolysnipError::ImageWrite { path, .. } => {
            assert_eq!(path, temp.path().join("out").join("img_10,10_mask.png"))
        }
        other => panic!("expected ImageWrite, got {:?}", other),
    }
    assert!(temp.path().join("out").join("img_10,10.png").is_file());
}

#[test]
fn existing_output_directory_is_reused() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("img.png");
    write_png(&source, 100, 100);
    fs::create_dir_all(temp.path().join("out")).expect("pre-create dir");
    fs::write(temp.path().join("out/keep.txt"), "x").expect("write marker");
    let image = open_image(&source).expect("open image");

    extract_polygon(&image, &square(), &source, "out").expect("extract");

    assert_eq!(
        file_names(&temp.path().join("out")),
        vec!["img_10,10.png", "img_10,10_mask.png", "keep.txt"]
    );
}

#[test]
fn polygon_past_image_edge_is_clamped() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("img.png");
    write_png(&source, 30, 30);
    let image = open_image(&source).expect("open image");

    let points = vec![
        Point::new(-10.0, 5.0),
        Point::new(20.0, 5.0),
        Point::new(20.0, 45.0),
    ];
    let extracted = extract_polygon(&image, &points, &source, "edge").expect("extract");

    assert_eq!(extracted.bbox, BoundingBox::new(0, 5, 20, 30));
    assert!(extracted.region_path.ends_with("img_0,5.png"));
}

#[test]
fn extract_accepts_precomputed_mask_and_bmp_output() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("scan.bmp");
    let image = DynamicImage::ImageRgb8(gradient_image(40, 40));
    image.save(&source).expect("write bmp");

    let points = square();
    let bbox = bounding_box(&points).expect("bbox");
    let mask = rasterize(&points, 40, 40).expect("mask");

    let extracted = extract(&image, &mask, bbox, &source, "bmp_out").expect("extract");

    assert!(extracted.region_path.ends_with("scan_10,10.bmp"));
    let written = image::open(&extracted.mask_path).expect("read mask").to_luma8();
    assert_eq!(written.dimensions(), (30, 30));
}

#[test]
fn unknown_extension_is_rejected() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let image = DynamicImage::new_rgb8(20, 20);
    let base = temp.path().join("img.notanimage");

    let err = extract_polygon(&image, &square(), &base, "out").unwrap_err();

    assert!(matches!(err, PolysnipError::UnsupportedImageFormat(_)));
}

#[test]
fn incomplete_polygon_is_rejected() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let image = DynamicImage::new_rgb8(20, 20);
    let base = temp.path().join("img.png");

    let err = extract_polygon(&image, &square()[..2], &base, "out").unwrap_err();

    assert!(matches!(err, PolysnipError::InsufficientPoints { count: 2 }));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn missing_source_image_reports_path() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let missing = temp.path().join("nope.png");

    match open_image(&missing) {
        Err(PolysnipError::ImageRead { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected ImageRead, got {:?}", other.map(|_| ())),
    }
}
