pub mod assemble;
pub mod constants;
mod fingerprint;
mod fit;
mod options;
pub mod render;
mod receipt;
mod report;
mod types;

pub use assemble::{ReportAssembler, compile_report, default_file_name, save_report};
pub use fingerprint::{ReceiptFingerprint, decode_rgb, fingerprint, fingerprint_image};
pub use fit::{PageFit, fit};
pub use options::*;
pub use receipt::*;
pub use render::{render_raster_page, render_summary_page, summary_lines};
pub use report::*;
pub use types::*;
