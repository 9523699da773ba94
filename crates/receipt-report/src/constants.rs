//! Shared constants for report compilation
//!
//! This module centralizes magic numbers used by the page renderers.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Raster Receipts
// =============================================================================

/// JPEG quality used when re-encoding raster receipts
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Resource name of the receipt image on its page
pub const RECEIPT_IMAGE_NAME: &str = "Im0";

// =============================================================================
// Summary Page
// =============================================================================

/// Left edge of every summary line (points)
pub const SUMMARY_LEFT_PT: f32 = 50.0;

/// Distance from the top edge to the title baseline (points)
pub const SUMMARY_TITLE_TOP_PT: f32 = 42.0;

/// Vertical distance between consecutive lines (points)
pub const SUMMARY_LINE_HEIGHT_PT: f32 = 20.0;

/// Extra space above the category block (points)
pub const SUMMARY_SECTION_GAP_PT: f32 = 10.0;

pub const SUMMARY_TITLE_SIZE: f32 = 14.0;
pub const SUMMARY_TEXT_SIZE: f32 = 12.0;
pub const SUMMARY_CATEGORY_SIZE: f32 = 11.0;

/// Title printed on the summary page unless configured otherwise
pub const DEFAULT_TITLE: &str = "EXPENSE REIMBURSEMENT REQUEST";

/// The single currency this system books amounts in
pub const DEFAULT_CURRENCY: &str = "RSD";

/// File name prefix for delivered reports
pub const REPORT_FILE_PREFIX: &str = "reimbursement";
