//! Page renderers
//!
//! Both renderers produce standalone single-page documents which the
//! assembler then imports into the report:
//! - the summary page, drawn with printpdf's builtin Helvetica
//! - one page per raster receipt, built directly with lopdf

mod raster;
mod summary;

pub use raster::{render_raster_image, render_raster_page};
pub use summary::{SummaryLine, render_summary_page, summary_lines};
