//! Summary (cover) page
//!
//! Laid out as a fixed list of text lines: header block, one line per
//! category in the order supplied, then the grand total. The page never
//! paginates; a very long category list simply runs off the bottom.

use crate::constants::*;
use crate::options::ReportOptions;
use crate::receipt::ReportRequest;
use crate::types::{PageSize, ReportError, Result};
use lopdf::Document;
use printpdf::{Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem};

/// One line of text on the summary page
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub text: String,
    pub bold: bool,
    pub font_size: f32,
    /// Baseline distance from the top edge of the page, in points
    pub top_pt: f32,
}

/// Compute the summary page lines for a request
pub fn summary_lines(
    request: &ReportRequest,
    options: &ReportOptions,
) -> Result<Vec<SummaryLine>> {
    let grand_total = request.grand_total().ok_or_else(|| {
        ReportError::Config("Category totals overflow the grand total".to_string())
    })?;

    let mut lines = Vec::new();
    let mut top = SUMMARY_TITLE_TOP_PT;

    let mut push = |text: String, bold: bool, font_size: f32, top: f32| {
        lines.push(SummaryLine {
            text,
            bold,
            font_size,
            top_pt: top,
        });
    };

    push(options.title.clone(), true, SUMMARY_TITLE_SIZE, top);
    top += SUMMARY_LINE_HEIGHT_PT;
    push(
        format!("Requested by: {}", request.requester),
        false,
        SUMMARY_TEXT_SIZE,
        top,
    );
    top += SUMMARY_LINE_HEIGHT_PT;
    push(
        format!("Approved by: {}", request.approver),
        false,
        SUMMARY_TEXT_SIZE,
        top,
    );
    top += SUMMARY_LINE_HEIGHT_PT;
    push(
        format!("Request date: {}", request.date.format("%Y-%m-%d")),
        false,
        SUMMARY_TEXT_SIZE,
        top,
    );

    top += SUMMARY_LINE_HEIGHT_PT + SUMMARY_SECTION_GAP_PT;
    push(
        "Totals by category:".to_string(),
        true,
        SUMMARY_TEXT_SIZE,
        top,
    );

    for category in &request.categories {
        top += SUMMARY_LINE_HEIGHT_PT;
        push(
            format!("{}: {} {}", category.label, category.total, options.currency),
            false,
            SUMMARY_CATEGORY_SIZE,
            top,
        );
    }

    top += SUMMARY_LINE_HEIGHT_PT;
    push(
        format!("TOTAL: {} {}", grand_total, options.currency),
        true,
        SUMMARY_TEXT_SIZE,
        top,
    );

    Ok(lines)
}

/// Render the summary page as a single-page document
pub fn render_summary_page(request: &ReportRequest, options: &ReportOptions) -> Result<Document> {
    let bytes = summary_page_bytes(&summary_lines(request, options)?)?;
    Document::load_mem(&bytes)
        .map_err(|e| ReportError::Summary(format!("Generated summary is unreadable: {}", e)))
}

fn summary_page_bytes(lines: &[SummaryLine]) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new("Expense reimbursement request");

    // Embedded so names outside WinAnsi (ć, č, đ) survive
    let regular = doc.add_font(&parse_font(include_bytes!("../../fonts/DejaVuSans.ttf"))?);
    let bold = doc.add_font(&parse_font(include_bytes!("../../fonts/DejaVuSans-Bold.ttf"))?);

    let (_, page_height_pt) = PageSize::A4.dimensions_pt();

    let mut ops = Vec::new();
    for line in lines {
        let font = if line.bold { &bold } else { &regular };
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(SUMMARY_LEFT_PT),
                y: Pt(page_height_pt - line.top_pt),
            },
        });
        ops.push(Op::SetFontSize {
            font: font.clone(),
            size: Pt(line.font_size),
        });
        ops.push(Op::WriteText {
            items: vec![TextItem::Text(line.text.clone())],
            font: font.clone(),
        });
        ops.push(Op::EndTextSection);
    }

    doc.pages = vec![PdfPage::new(
        Mm(PageSize::A4.width_mm),
        Mm(PageSize::A4.height_mm),
        ops,
    )];

    let mut warnings = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

fn parse_font(bytes: &[u8]) -> Result<ParsedFont> {
    let mut warnings = Vec::new();
    ParsedFont::from_bytes(bytes, 0, &mut warnings)
        .ok_or_else(|| ReportError::Summary("Failed to parse font".to_string()))
}
