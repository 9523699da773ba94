mod common;

use common::*;
use image::{DynamicImage, Rgba, RgbaImage};
use receipt_report::*;
use tempfile::tempdir;

#[test]
fn test_same_pixels_different_names_collide() {
    let dir = tempdir().unwrap();
    let a = write_test_image(dir.path(), "fuel.png", 30, 40, 7);
    let b = write_test_image(dir.path(), "fuel_copy.png", 30, 40, 7);

    let fa = fingerprint(&a).unwrap();
    let fb = fingerprint(&b).unwrap();
    assert_eq!(fa, fb);
}

#[test]
fn test_different_pixels_differ() {
    let dir = tempdir().unwrap();
    let a = write_test_image(dir.path(), "a.png", 30, 40, 7);
    let b = write_test_image(dir.path(), "b.png", 30, 40, 8);

    assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
}

#[test]
fn test_alpha_is_dropped_before_hashing() {
    let dir = tempdir().unwrap();
    let opaque = write_test_image(dir.path(), "opaque.png", 16, 16, 3);

    // Same colours, but stored with a half-transparent alpha channel
    let rgb = test_image(16, 16, 3);
    let rgba = RgbaImage::from_fn(16, 16, |x, y| {
        let p = rgb.get_pixel(x, y);
        Rgba([p[0], p[1], p[2], 128])
    });
    let translucent = dir.path().join("translucent.png");
    DynamicImage::ImageRgba8(rgba).save(&translucent).unwrap();

    assert_eq!(
        fingerprint(&opaque).unwrap(),
        fingerprint(&translucent).unwrap()
    );
}

#[test]
fn test_format_is_detected_from_content() {
    let dir = tempdir().unwrap();
    let png = write_test_image(dir.path(), "scan.png", 12, 12, 1);
    let misnamed = dir.path().join("scan.jpg");
    std::fs::copy(&png, &misnamed).unwrap();

    assert_eq!(fingerprint(&png), fingerprint(&misnamed));
}

#[test]
fn test_corrupt_file_is_absent() {
    let dir = tempdir().unwrap();
    let bad = write_corrupt_file(dir.path(), "broken.jpg");
    assert!(fingerprint(&bad).is_none());
}

#[test]
fn test_missing_file_is_absent() {
    let dir = tempdir().unwrap();
    assert!(fingerprint(&dir.path().join("nowhere.png")).is_none());
}

#[test]
fn test_shape_is_part_of_the_fingerprint() {
    let wide = image::RgbImage::from_pixel(4, 2, image::Rgb([9, 9, 9]));
    let tall = image::RgbImage::from_pixel(2, 4, image::Rgb([9, 9, 9]));
    assert_eq!(wide.as_raw(), tall.as_raw());
    assert_ne!(fingerprint_image(&wide), fingerprint_image(&tall));
}

#[test]
fn test_fingerprint_displays_as_hex() {
    let image = test_image(2, 2, 0);
    let text = fingerprint_image(&image).to_string();
    assert_eq!(text.len(), 64);
    assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
}
