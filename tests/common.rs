//! Test utilities & fixtures.
//! Every test works inside its own temp data directory.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// Fresh, empty data directory.
#[allow(dead_code)]
pub fn data_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

/// Write `config.yml` into `dir`.
#[allow(dead_code)]
pub fn write_config(dir: &Path, yaml: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("config.yml"), yaml).unwrap();
}

/// Encode a solid-colour square image in `format`.
#[allow(dead_code)]
pub fn image_bytes(size: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(size, size, Rgba([30, 120, 200, 255])));
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format).unwrap();
    out
}

/// Put a 64x64 PNG named `name` into `<dir>/favicons/`.
#[allow(dead_code)]
pub fn write_icon(dir: &Path, name: &str) {
    write_favicon_bytes(dir, name, &image_bytes(64, ImageFormat::Png));
}

/// Put arbitrary bytes into `<dir>/favicons/<name>`.
#[allow(dead_code)]
pub fn write_favicon_bytes(dir: &Path, name: &str, bytes: &[u8]) {
    let icons = dir.join("favicons");
    std::fs::create_dir_all(&icons).unwrap();
    std::fs::write(icons.join(name), bytes).unwrap();
}
