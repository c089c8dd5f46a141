//! PDF rendering of laid-out reports.
//!
//! Rendering happens in two steps. First the layout geometry and row cell
//! data are combined into a per-page display list (text runs, rule lines,
//! filled bands) that callers can use as an in-memory preview. Then the
//! display list is encoded into PDF objects: a catalog, a page tree, the
//! two base-14 Helvetica fonts, and one content stream per page.
//!
//! Display-list coordinates are top-down like the layout's; the PDF
//! origin is bottom-left, so y values are flipped at encoding time.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::error::{Error, Result};
use crate::report::layout::{PageLayout, ReportLayout};
use crate::report::ReportRow;

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 9.0;
const CELL_SIZE: f32 = 9.0;

/// Left/right inset of text within its column.
const CELL_PADDING: f32 = 4.0;
/// Baseline height above the bottom of a data row.
const ROW_BASELINE_INSET: f32 = 7.0;
/// Baseline height above the bottom of the header band.
const HEADER_BASELINE_INSET: f32 = 8.0;
/// Average glyph width as a fraction of the font size, close enough for
/// the base-14 Helvetica metrics this renderer uses.
const CHAR_WIDTH: f32 = 0.5;

const HEADER_BAND_GRAY: f32 = 0.92;
const RULE_GRAY: f32 = 0.6;
const RULE_WIDTH: f32 = 0.5;

const FONT_REGULAR: &[u8] = b"F1";
const FONT_BOLD: &[u8] = b"F2";

/// A piece of text positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Left edge of the text.
    pub x: f32,
    /// Baseline, from the top of the page.
    pub y: f32,
    /// Font size in points.
    pub size: f32,
    /// Drawn in the bold face.
    pub bold: bool,
    /// The text itself.
    pub text: String,
}

/// A horizontal or vertical separator line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleLine {
    /// Start x.
    pub x1: f32,
    /// Start y, from the top of the page.
    pub y1: f32,
    /// End x.
    pub x2: f32,
    /// End y, from the top of the page.
    pub y2: f32,
}

/// A filled background band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Left edge.
    pub x: f32,
    /// Top edge, from the top of the page.
    pub y: f32,
    /// Band width.
    pub width: f32,
    /// Band height.
    pub height: f32,
}

/// The display list for one rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePreview {
    /// Zero-based page number.
    pub page_index: usize,
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Filled bands, drawn first.
    pub bands: Vec<Band>,
    /// Separator lines, drawn over the bands.
    pub rules: Vec<RuleLine>,
    /// Text runs, drawn last.
    pub texts: Vec<TextRun>,
}

impl PagePreview {
    /// All text on the page, in draw order.
    #[must_use]
    pub fn text_contents(&self) -> Vec<&str> {
        self.texts.iter().map(|run| run.text.as_str()).collect()
    }
}

/// A fully rendered report: durable bytes plus the per-page previews.
///
/// The preview side carries everything needed to show the document
/// without parsing the bytes back. Rendering has no storage side
/// effects; persisting the bytes is the archive's job.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    /// The encoded PDF document.
    pub bytes: Vec<u8>,
    /// One display list per page, in page order.
    pub pages: Vec<PagePreview>,
}

impl RenderedReport {
    /// Number of pages in the document.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Render laid-out pages into a PDF document.
///
/// # Errors
///
/// Returns [`Error::Render`] when a page layout references a row index
/// that is not present in `rows`; nothing is produced in that case.
pub fn render(
    layout: &ReportLayout,
    rows: &[ReportRow],
    pages: &[PageLayout],
) -> Result<RenderedReport> {
    let previews = build_previews(layout, rows, pages)?;
    let bytes = encode(layout, &previews)?;
    Ok(RenderedReport {
        bytes,
        pages: previews,
    })
}

fn build_previews(
    layout: &ReportLayout,
    rows: &[ReportRow],
    pages: &[PageLayout],
) -> Result<Vec<PagePreview>> {
    pages
        .iter()
        .map(|page| build_page(layout, rows, page))
        .collect()
}

fn build_page(layout: &ReportLayout, rows: &[ReportRow], page: &PageLayout) -> Result<PagePreview> {
    let mut preview = PagePreview {
        page_index: page.page_index,
        width: layout.page_width,
        height: layout.page_height,
        bands: Vec::new(),
        rules: Vec::new(),
        texts: Vec::new(),
    };

    if let Some(title_y) = page.title_y {
        let width = estimate_width(&layout.title, TITLE_SIZE);
        let x = ((layout.page_width - width) / 2.0).max(layout.margin_left);
        preview.texts.push(TextRun {
            x,
            y: title_y,
            size: TITLE_SIZE,
            bold: true,
            text: layout.title.clone(),
        });
    }

    if let Some(header_y) = page.header_y {
        preview.bands.push(Band {
            x: layout.margin_left,
            y: header_y,
            width: layout.body_width(),
            height: layout.header_height,
        });
        let baseline = header_y + layout.header_height - HEADER_BASELINE_INSET;
        for (index, column) in layout.columns.iter().enumerate() {
            preview.texts.push(TextRun {
                x: layout.column_x(index) + CELL_PADDING,
                y: baseline,
                size: HEADER_SIZE,
                bold: true,
                text: column.label.to_string(),
            });
        }
        preview.rules.push(horizontal_rule(layout, header_y + layout.header_height));
    }

    for slot in &page.rows {
        let row = rows.get(slot.index).ok_or_else(|| {
            Error::render(format!(
                "page {} references missing row {}",
                page.page_index, slot.index
            ))
        })?;
        let baseline = slot.y + layout.row_height - ROW_BASELINE_INSET;
        for (index, column) in layout.columns.iter().enumerate() {
            let Some(cell) = row.get(index) else { break };
            if cell.is_empty() {
                continue;
            }
            preview.texts.push(TextRun {
                x: layout.column_x(index) + CELL_PADDING,
                y: baseline,
                size: CELL_SIZE,
                bold: false,
                text: truncate_to_width(cell, column.width, CELL_SIZE),
            });
        }
        preview.rules.push(horizontal_rule(layout, slot.y + layout.row_height));
    }

    Ok(preview)
}

fn horizontal_rule(layout: &ReportLayout, y: f32) -> RuleLine {
    RuleLine {
        x1: layout.margin_left,
        y1: y,
        x2: layout.page_width - layout.margin_right,
        y2: y,
    }
}

fn encode(layout: &ReportLayout, previews: &[PagePreview]) -> Result<Vec<u8>> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let font_regular_id = Ref::new(3);
    let font_bold_id = Ref::new(4);

    let object_id = |number: usize| -> Result<Ref> {
        i32::try_from(number)
            .map(Ref::new)
            .map_err(|_| Error::render("page count overflows object ids"))
    };

    let mut page_ids = Vec::with_capacity(previews.len());
    let mut content_ids = Vec::with_capacity(previews.len());
    for index in 0..previews.len() {
        page_ids.push(object_id(5 + 2 * index)?);
        content_ids.push(object_id(6 + 2 * index)?);
    }

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);

    let page_count = i32::try_from(previews.len())
        .map_err(|_| Error::render("page count overflows the page tree"))?;
    {
        let mut pages = pdf.pages(page_tree_id);
        pages.kids(page_ids.iter().copied());
        pages.count(page_count);
    }

    pdf.type1_font(font_regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(font_bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let media_box = Rect::new(0.0, 0.0, layout.page_width, layout.page_height);
    for (preview, (&page_id, &content_id)) in previews
        .iter()
        .zip(page_ids.iter().zip(content_ids.iter()))
    {
        let mut page = pdf.page(page_id);
        page.media_box(media_box);
        page.parent(page_tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(FONT_REGULAR), font_regular_id);
        fonts.pair(Name(FONT_BOLD), font_bold_id);
        drop(fonts);
        drop(resources);
        drop(page);

        let content = encode_page(layout, preview);
        pdf.stream(content_id, &content);
    }

    Ok(pdf.finish())
}

fn encode_page(layout: &ReportLayout, preview: &PagePreview) -> Vec<u8> {
    let flip = |y: f32| layout.page_height - y;
    let mut content = Content::new();

    if !preview.bands.is_empty() {
        content.set_fill_gray(HEADER_BAND_GRAY);
        for band in &preview.bands {
            content.rect(band.x, flip(band.y + band.height), band.width, band.height);
            content.fill_nonzero();
        }
        content.set_fill_gray(0.0);
    }

    if !preview.rules.is_empty() {
        content.set_stroke_gray(RULE_GRAY);
        content.set_line_width(RULE_WIDTH);
        for rule in &preview.rules {
            content.move_to(rule.x1, flip(rule.y1));
            content.line_to(rule.x2, flip(rule.y2));
            content.stroke();
        }
    }

    for run in &preview.texts {
        let font = if run.bold { FONT_BOLD } else { FONT_REGULAR };
        content.begin_text();
        content.set_font(Name(font), run.size);
        content.next_line(run.x, flip(run.y));
        content.show(Str(&win_ansi_bytes(&run.text)));
        content.end_text();
    }

    content.finish()
}

/// Lossy WinAnsi encoding: Latin-1 code points pass through, anything
/// else becomes '?'.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn estimate_width(text: &str, size: f32) -> f32 {
    let glyphs = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    f32::from(glyphs) * size * CHAR_WIDTH
}

/// Clip cell text to its column, keeping at least one character.
fn truncate_to_width(text: &str, column_width: f32, size: f32) -> String {
    let budget = ((column_width - 2.0 * CELL_PADDING) / (size * CHAR_WIDTH)) as usize;
    let budget = budget.max(1);
    if text.chars().count() <= budget {
        text.to_string()
    } else {
        text.chars().take(budget).collect()
    }
}
