#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};

/// An RGB image whose pixel `(x, y)` is `[x, y, 7]`, so crop offsets are
/// visible in the output.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 7]))
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    gradient_image(width, height)
        .save(path)
        .expect("write png file");
}

pub fn write_blank_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    RgbImage::new(width, height)
        .save(path)
        .expect("write png file");
}

pub fn square_catalog_json(image_name: &str, label: &str) -> String {
    format!(
        r#"{{
    "{image_name}": [
        {{
            "anatomy": "{label}",
            "points": [
                {{"x": 50, "y": 50, "order": 2}},
                {{"x": 10, "y": 10, "order": 0}},
                {{"x": 50, "y": 10, "order": 3}},
                {{"x": 10, "y": 50, "order": 1}}
            ]
        }}
    ]
}}"#
    )
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
