//! Logbook report generation.
//!
//! Turns flight records into a paginated, fixed-column PDF document.
//! [`layout`] decides where everything goes, [`pdf`] draws it; this
//! module derives the table cells from records and drives the two.

pub mod layout;
pub mod pdf;

pub use layout::{Column, PageLayout, ReportLayout, RowSlot};
pub use pdf::{PagePreview, RenderedReport};

use crate::error::Result;
use crate::flight_time::FlightTime;
use crate::record::FlightRecord;

/// One table row: a cell per report column.
pub type ReportRow = [String; 8];

/// Derive the report table cells from flight records, in input order.
///
/// Dates render as short dates ("14 Mar 2026"), durations are
/// re-rendered canonically, and the takeoff/landing counts become
/// decimal strings.
#[must_use]
pub fn flight_rows(records: &[FlightRecord]) -> Vec<ReportRow> {
    records
        .iter()
        .map(|record| {
            [
                record.date.format("%d %b %Y").to_string(),
                record.pilot.clone(),
                record.aircraft.clone(),
                record.departure.clone(),
                record.arrival.clone(),
                FlightTime::parse(&record.duration).to_string(),
                record.takeoffs.to_string(),
                record.landings.to_string(),
            ]
        })
        .collect()
}

/// Lay out and render the given records as a PDF report.
///
/// Pure with respect to storage: the result carries the document bytes
/// and per-page previews, and persisting either is entirely up to the
/// caller.
///
/// # Errors
///
/// Returns an error if rendering fails; see [`pdf::render`].
pub fn generate(records: &[FlightRecord], layout: &ReportLayout) -> Result<RenderedReport> {
    let rows = flight_rows(records);
    let pages = layout.paginate(rows.len());
    pdf::render(layout, &rows, &pages)
}
