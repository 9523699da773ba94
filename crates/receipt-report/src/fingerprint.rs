//! Content fingerprints for raster receipt deduplication

use image::{ImageReader, RgbImage};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// SHA-256 of a decoded, RGB8-normalized image and its dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiptFingerprint([u8; 32]);

impl ReceiptFingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ReceiptFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Decode an image file into 8-bit RGB, dropping any alpha channel.
///
/// The format is detected from the content, not the extension, and the
/// decoder's allocation limits are lifted so large scans still load.
pub fn decode_rgb(path: &Path) -> image::ImageResult<RgbImage> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.no_limits();
    Ok(reader.decode()?.to_rgb8())
}

/// Fingerprint a raster receipt file.
///
/// Returns `None` when the file cannot be opened or decoded.
pub fn fingerprint(path: &Path) -> Option<ReceiptFingerprint> {
    match decode_rgb(path) {
        Ok(image) => Some(fingerprint_image(&image)),
        Err(e) => {
            log::debug!("Cannot fingerprint {}: {}", path.display(), e);
            None
        }
    }
}

/// Fingerprint already decoded pixels.
///
/// Not a plain digest of the pixel bytes: width and height are hashed
/// ahead of them, so two images whose raw bytes coincide but whose shapes
/// differ (40x20 and 20x40 of one colour) get different fingerprints.
pub fn fingerprint_image(image: &RgbImage) -> ReceiptFingerprint {
    let mut hasher = Sha256::new();
    hasher.update(image.width().to_be_bytes());
    hasher.update(image.height().to_be_bytes());
    hasher.update(image.as_raw());

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    ReceiptFingerprint(digest)
}
