//! Page-fit geometry for raster receipts

/// Placement of a scaled image on a page.
///
/// Offsets are measured from the page's top-left corner and may be
/// negative when the image overflows the page on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFit {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

/// Scale an image to the page, preserving its aspect ratio.
///
/// An image relatively wider than the page is scaled to the full page
/// height and overflows horizontally; any other image is scaled to the full
/// page width. The result is centered on both axes.
pub fn fit(image_width: f32, image_height: f32, page_width: f32, page_height: f32) -> PageFit {
    let image_ratio = image_width / image_height;
    let page_ratio = page_width / page_height;

    let (width, height) = if image_ratio > page_ratio {
        (page_height * image_ratio, page_height)
    } else {
        (page_width, page_width / image_ratio)
    };

    PageFit {
        width,
        height,
        x: (page_width - width) / 2.0,
        y: (page_height - height) / 2.0,
    }
}

impl PageFit {
    /// Lower-left corner in PDF user space for a page of the given height
    pub fn pdf_origin(&self, page_height: f32) -> (f32, f32) {
        (self.x, page_height - self.y - self.height)
    }
}
