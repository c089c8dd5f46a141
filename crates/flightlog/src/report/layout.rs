//! Tabular report layout.
//!
//! Computes where everything lands on each page before any drawing
//! happens: the title block, the column header band, and one slot per
//! table row, paginated against a fixed page geometry. Coordinates here
//! are top-down (y grows toward the bottom margin); the renderer converts
//! to the output format's coordinate space.

/// One fixed-width table column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header label, e.g. "Duration".
    pub label: &'static str,
    /// Column width in points.
    pub width: f32,
}

/// Page geometry and table shape for a report.
///
/// Column widths plus horizontal margins are expected to fit the page
/// width; that is a configuration precondition, not a runtime check.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    /// Page width in points.
    pub page_width: f32,
    /// Page height in points.
    pub page_height: f32,
    /// Left margin in points.
    pub margin_left: f32,
    /// Right margin in points.
    pub margin_right: f32,
    /// Top margin in points.
    pub margin_top: f32,
    /// Bottom margin in points.
    pub margin_bottom: f32,
    /// Title baseline, measured from the top of page 1.
    pub title_offset: f32,
    /// Top of the header band, measured from the top of page 1.
    pub header_offset: f32,
    /// Height of the header band.
    pub header_height: f32,
    /// Height of every data row.
    pub row_height: f32,
    /// Repeat the header band on continuation pages.
    pub repeat_header: bool,
    /// Report title, centered on page 1.
    pub title: String,
    /// Ordered table columns.
    pub columns: Vec<Column>,
}

impl Default for ReportLayout {
    /// A4 landscape with the standard eight logbook columns.
    fn default() -> Self {
        Self {
            page_width: 841.89,
            page_height: 595.28,
            margin_left: 36.0,
            margin_right: 36.0,
            margin_top: 36.0,
            margin_bottom: 36.0,
            title_offset: 50.0,
            header_offset: 78.0,
            header_height: 24.0,
            row_height: 22.0,
            repeat_header: false,
            title: "Flight Logbook".to_string(),
            columns: vec![
                Column { label: "Date", width: 90.0 },
                Column { label: "Pilot", width: 200.0 },
                Column { label: "Aircraft", width: 110.0 },
                Column { label: "From", width: 70.0 },
                Column { label: "To", width: 70.0 },
                Column { label: "Duration", width: 80.0 },
                Column { label: "T/O", width: 55.0 },
                Column { label: "Ldg", width: 55.0 },
            ],
        }
    }
}

/// A positioned table row on some page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    /// Index into the flat row list handed to the renderer.
    pub index: usize,
    /// Top of the row, from the top of the page.
    pub y: f32,
}

/// Everything placed on a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Zero-based page number.
    pub page_index: usize,
    /// Title baseline; present on page 1 only.
    pub title_y: Option<f32>,
    /// Top of the header band, when this page carries one.
    pub header_y: Option<f32>,
    /// Rows placed on this page, in order.
    pub rows: Vec<RowSlot>,
    /// Vertical cursor after the last placed row.
    pub cursor: f32,
}

impl ReportLayout {
    /// Lowest y a row may extend to before the page breaks.
    #[must_use]
    pub fn body_limit(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    /// Usable width between the horizontal margins.
    #[must_use]
    pub fn body_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Top of the first data row on page 1.
    #[must_use]
    pub fn first_row_top(&self) -> f32 {
        self.header_offset + self.header_height
    }

    /// Left edge of the column at `index`.
    #[must_use]
    pub fn column_x(&self, index: usize) -> f32 {
        let preceding: f32 = self.columns[..index].iter().map(|c| c.width).sum();
        self.margin_left + preceding
    }

    /// Distribute `row_count` rows across pages.
    ///
    /// A row whose bottom would cross the bottom margin closes the current
    /// page and becomes the first row of the next. Zero rows still produce
    /// a single page carrying the title and header. A row too tall for an
    /// empty page is placed regardless so pagination always terminates.
    #[must_use]
    pub fn paginate(&self, row_count: usize) -> Vec<PageLayout> {
        let limit = self.body_limit();
        let mut pages = Vec::new();
        let mut page = PageLayout {
            page_index: 0,
            title_y: Some(self.title_offset),
            header_y: Some(self.header_offset),
            rows: Vec::new(),
            cursor: self.first_row_top(),
        };

        for index in 0..row_count {
            if page.cursor + self.row_height > limit && !page.rows.is_empty() {
                let next_index = page.page_index + 1;
                pages.push(page);
                page = self.continuation_page(next_index);
            }
            page.rows.push(RowSlot {
                index,
                y: page.cursor,
            });
            page.cursor += self.row_height;
        }

        pages.push(page);
        pages
    }

    fn continuation_page(&self, page_index: usize) -> PageLayout {
        let (header_y, cursor) = if self.repeat_header {
            (Some(self.margin_top), self.margin_top + self.header_height)
        } else {
            (None, self.margin_top)
        };
        PageLayout {
            page_index,
            title_y: None,
            header_y,
            rows: Vec::new(),
            cursor,
        }
    }
}
