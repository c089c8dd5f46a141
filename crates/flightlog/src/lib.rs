//! `flightlog` - A personal flight logbook with paginated PDF reports
//!
//! This library provides the core functionality for recording flights and
//! their supporting registries, computing flight time totals, and rendering
//! the logbook as a paginated PDF that is archived alongside its metadata.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod flight_time;
pub mod logging;
pub mod record;
pub mod report;
pub mod stats;
pub mod store;

pub use archive::{ReportArchive, StagedReport};
pub use config::Config;
pub use error::{Error, Result};
pub use flight_time::FlightTime;
pub use logging::init_logging;
pub use record::{Aircraft, Airfield, DayNight, FlightRecord, Pilot};
pub use report::{ReportLayout, RenderedReport};
pub use stats::{FlightStatistic, FlightTotals};
pub use store::{Storage, StoredReport};
