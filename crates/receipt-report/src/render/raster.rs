//! Raster receipt pages
//!
//! Each image receipt becomes a single A4 portrait page holding the image
//! re-encoded as JPEG, scaled and centered by [`crate::fit`].

use crate::constants::{RECEIPT_IMAGE_NAME, mm_to_pt};
use crate::fingerprint::decode_rgb;
use crate::fit::{PageFit, fit};
use crate::options::ReportOptions;
use crate::types::{PageSize, RenderError};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::RgbImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::borrow::Cow;
use std::path::Path;

type RenderResult<T> = std::result::Result<T, RenderError>;

// =============================================================================
// Public API
// =============================================================================

/// Decode an image file and render it onto a fresh single-page document.
pub fn render_raster_page(path: &Path, options: &ReportOptions) -> RenderResult<Document> {
    let image = decode_rgb(path)?;
    render_raster_image(&image, options)
}

/// Render decoded pixels onto a fresh single-page document.
pub fn render_raster_image(image: &RgbImage, options: &ReportOptions) -> RenderResult<Document> {
    if image.width() == 0 || image.height() == 0 {
        return Err(RenderError::EmptyImage);
    }

    let image = downsample(image, options.max_image_dimension);
    let (page_width_mm, page_height_mm) = PageSize::A4.dimensions_mm();
    let placement = fit(
        image.width() as f32,
        image.height() as f32,
        page_width_mm,
        page_height_mm,
    );

    let jpeg = encode_jpeg(&image, options.jpeg_quality)?;
    Ok(build_image_page(
        jpeg,
        image.width(),
        image.height(),
        &placement,
    ))
}

// =============================================================================
// Image Preparation
// =============================================================================

/// Shrink so the longest side is at most `max_dimension` pixels
fn downsample(image: &RgbImage, max_dimension: Option<u32>) -> Cow<'_, RgbImage> {
    let Some(max) = max_dimension else {
        return Cow::Borrowed(image);
    };

    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max {
        return Cow::Borrowed(image);
    }

    let scale = max as f64 / longest as f64;
    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    Cow::Owned(imageops::resize(
        image,
        new_width,
        new_height,
        FilterType::Triangle,
    ))
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> RenderResult<Vec<u8>> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality).encode_image(image)?;
    Ok(jpeg)
}

// =============================================================================
// Document Construction
// =============================================================================

/// Build a one-page document drawing the JPEG at `placement` (millimetres).
fn build_image_page(jpeg: Vec<u8>, width_px: u32, height_px: u32, placement: &PageFit) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = add_jpeg_xobject(&mut doc, jpeg, width_px, height_px);

    let (page_width_pt, page_height_pt) = PageSize::A4.dimensions_pt();
    let (x_mm, y_mm) = placement.pdf_origin(PageSize::A4.height_mm);
    let content = format!(
        "q {:.4} 0 0 {:.4} {:.4} {:.4} cm /{} Do Q",
        mm_to_pt(placement.width),
        mm_to_pt(placement.height),
        mm_to_pt(x_mm),
        mm_to_pt(y_mm),
        RECEIPT_IMAGE_NAME,
    );
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set(RECEIPT_IMAGE_NAME, Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_width_pt),
            Object::Real(page_height_pt),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));
    let page_id = doc.add_object(page_dict);

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages_dict.set("Count", Object::Integer(1));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Embed JPEG bytes as a DCTDecode image XObject
fn add_jpeg_xobject(doc: &mut Document, jpeg: Vec<u8>, width_px: u32, height_px: u32) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width_px as i64));
    dict.set("Height", Object::Integer(height_px as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    let mut stream = Stream::new(dict, jpeg);
    // Already compressed
    stream.allows_compression = false;
    doc.add_object(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_empty_image_is_rejected() {
        let result = render_raster_image(&RgbImage::new(0, 0), &ReportOptions::default());
        assert!(matches!(result, Err(RenderError::EmptyImage)));

        let result = render_raster_image(&RgbImage::new(0, 10), &ReportOptions::default());
        assert!(matches!(result, Err(RenderError::EmptyImage)));
    }

    #[test]
    fn test_image_too_wide_for_jpeg_fails_to_render() {
        let image = RgbImage::from_pixel(70_000, 1, Rgb([9, 9, 9]));
        let result = render_raster_image(&image, &ReportOptions::default());
        assert!(matches!(result, Err(RenderError::Image(_))));

        // Downsampling brings it back into range
        let options = ReportOptions {
            max_image_dimension: Some(2000),
            ..Default::default()
        };
        assert!(render_raster_image(&image, &options).is_ok());
    }

    #[test]
    fn test_downsample_keeps_small_images() {
        let image = RgbImage::from_pixel(40, 20, Rgb([1, 2, 3]));
        assert!(matches!(downsample(&image, Some(100)), Cow::Borrowed(_)));
        assert!(matches!(downsample(&image, None), Cow::Borrowed(_)));
    }

    #[test]
    fn test_downsample_bounds_longest_side() {
        let image = RgbImage::from_pixel(400, 100, Rgb([1, 2, 3]));
        let small = downsample(&image, Some(200));
        assert_eq!(small.dimensions(), (200, 50));
    }

    #[test]
    fn test_encode_jpeg_produces_jfif() {
        let image = RgbImage::from_pixel(8, 8, Rgb([200, 10, 10]));
        let jpeg = encode_jpeg(&image, 90).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
