//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand};

use crate::record::{Aircraft, Airfield, DayNight, FlightRecord, Pilot};

/// Flight logging commands.
#[derive(Debug, Subcommand)]
pub enum FlightCommand {
    /// Add a flight to the logbook
    Add(AddFlightArgs),

    /// List logged flights
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Remove a flight by id
    Remove {
        /// Flight id as shown by `flight list`
        id: i64,
    },
}

/// Arguments for `flight add`.
#[derive(Debug, Args)]
pub struct AddFlightArgs {
    /// Date of the flight (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Pilot in command
    #[arg(long)]
    pub pilot: String,

    /// Crew designation, e.g. PIC or Dual
    #[arg(long, default_value = "PIC")]
    pub designation: String,

    /// Aircraft registration
    #[arg(long)]
    pub aircraft: String,

    /// Departure airfield code
    #[arg(long = "from", value_name = "CODE")]
    pub departure: String,

    /// Arrival airfield code
    #[arg(long = "to", value_name = "CODE")]
    pub arrival: String,

    /// Takeoff time (HH:MM)
    #[arg(long, value_parser = parse_clock_time, value_name = "HH:MM")]
    pub takeoff: NaiveTime,

    /// Landing time (HH:MM); earlier than takeoff means landed next day
    #[arg(long, value_parser = parse_clock_time, value_name = "HH:MM")]
    pub landing: NaiveTime,

    /// Log this as a night flight
    #[arg(long)]
    pub night: bool,

    /// Number of takeoffs
    #[arg(long, default_value_t = 1)]
    pub takeoffs: u32,

    /// Number of landings
    #[arg(long, default_value_t = 1)]
    pub landings: u32,

    /// Logged duration (HH:MM); computed from the times when omitted
    #[arg(long, value_parser = parse_duration_arg, value_name = "HH:MM")]
    pub duration: Option<String>,

    /// Free-form remarks
    #[arg(long, default_value = "")]
    pub remarks: String,
}

impl AddFlightArgs {
    /// Build a logbook record from the parsed arguments.
    ///
    /// A landing time earlier than the takeoff time is taken to mean the
    /// flight landed the following day. When `--duration` is omitted, the
    /// duration is computed from the takeoff and landing times.
    #[must_use]
    pub fn into_record(self) -> FlightRecord {
        let departure_time = self.date.and_time(self.takeoff);
        let arrival_date = if self.landing < self.takeoff {
            self.date.succ_opt().unwrap_or(self.date)
        } else {
            self.date
        };
        let arrival_time = arrival_date.and_time(self.landing);
        let day_night = if self.night {
            DayNight::Night
        } else {
            DayNight::Day
        };

        let mut record = FlightRecord {
            id: None,
            date: self.date,
            pilot: self.pilot,
            designation: self.designation,
            aircraft: self.aircraft,
            departure: self.departure,
            departure_time,
            arrival: self.arrival,
            arrival_time,
            day_night,
            takeoffs: self.takeoffs,
            landings: self.landings,
            duration: String::new(),
            remarks: self.remarks,
        };
        record.duration = self
            .duration
            .unwrap_or_else(|| record.computed_duration().to_string());
        record
    }
}

/// Pilot registry commands.
#[derive(Debug, Subcommand)]
pub enum PilotCommand {
    /// Add a pilot to the registry
    Add(AddPilotArgs),

    /// List registered pilots
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Remove a pilot by id
    Remove {
        /// Pilot id as shown by `pilot list`
        id: i64,
    },
}

/// Arguments for `pilot add`.
#[derive(Debug, Args)]
pub struct AddPilotArgs {
    /// Full name
    pub name: String,

    /// Postal address
    #[arg(long, default_value = "")]
    pub address: String,

    /// Telephone number
    #[arg(long, default_value = "")]
    pub telephone: String,

    /// Email address
    #[arg(long, default_value = "")]
    pub email: String,
}

impl AddPilotArgs {
    /// Build a registry entry from the parsed arguments.
    #[must_use]
    pub fn into_pilot(self) -> Pilot {
        Pilot {
            id: None,
            name: self.name,
            address: self.address,
            telephone: self.telephone,
            email: self.email,
        }
    }
}

/// Aircraft registry commands.
#[derive(Debug, Subcommand)]
pub enum AircraftCommand {
    /// Add an aircraft to the registry
    Add(AddAircraftArgs),

    /// List registered aircraft
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Remove an aircraft by id
    Remove {
        /// Aircraft id as shown by `aircraft list`
        id: i64,
    },
}

/// Arguments for `aircraft add`.
#[derive(Debug, Args)]
pub struct AddAircraftArgs {
    /// Registration, e.g. G-ABCD
    pub registration: String,

    /// Manufacturer
    #[arg(long, default_value = "")]
    pub make: String,

    /// Model
    #[arg(long, default_value = "")]
    pub model: String,

    /// ICAO type designator, e.g. C172
    #[arg(long, default_value = "")]
    pub code: String,

    /// Engine type, e.g. SEP
    #[arg(long, default_value = "SEP")]
    pub engine_type: String,
}

impl AddAircraftArgs {
    /// Build a registry entry from the parsed arguments.
    #[must_use]
    pub fn into_aircraft(self) -> Aircraft {
        Aircraft {
            id: None,
            registration: self.registration,
            make: self.make,
            model: self.model,
            code: self.code,
            engine_type: self.engine_type,
        }
    }
}

/// Airfield registry commands.
#[derive(Debug, Subcommand)]
pub enum AirfieldCommand {
    /// Add an airfield to the registry
    Add(AddAirfieldArgs),

    /// List registered airfields
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Remove an airfield by id
    Remove {
        /// Airfield id as shown by `airfield list`
        id: i64,
    },
}

/// Arguments for `airfield add`.
#[derive(Debug, Args)]
pub struct AddAirfieldArgs {
    /// Airfield code, e.g. EGLL
    pub code: String,

    /// Airfield name
    #[arg(default_value = "")]
    pub name: String,

    /// County or region
    #[arg(long, default_value = "")]
    pub county: String,

    /// Country
    #[arg(long, default_value = "")]
    pub country: String,

    /// Contact telephone number
    #[arg(long, default_value = "")]
    pub telephone: String,

    /// Website address
    #[arg(long, default_value = "")]
    pub website: String,
}

impl AddAirfieldArgs {
    /// Build a registry entry from the parsed arguments.
    #[must_use]
    pub fn into_airfield(self) -> Airfield {
        Airfield {
            id: None,
            code: self.code,
            name: self.name,
            county: self.county,
            country: self.country,
            telephone: self.telephone,
            website: self.website,
        }
    }
}

/// Totals command arguments.
#[derive(Debug, Args)]
pub struct TotalsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Report commands.
#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Generate a PDF report from the logbook and archive it
    Generate {
        /// Also write a copy of the report to this path
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// List archived reports
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Write an archived report to a file
    Export {
        /// Report id as shown by `report list`
        id: i64,

        /// Destination file path
        #[arg(short, long, value_name = "FILE")]
        to: PathBuf,
    },

    /// Delete an archived report
    Delete {
        /// Report id as shown by `report list`
        id: i64,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Accept `HH:MM` (or `HH:MM:SS`) clock times.
fn parse_clock_time(text: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .map_err(|_| format!("expected a clock time like 14:05, got \"{text}\""))
}

/// Accept only syntactically valid `HH:MM` durations.
///
/// The core duration parser treats malformed text as a zero duration;
/// silently logging 00:00 for a mistyped argument would be surprising,
/// so the CLI rejects it up front.
fn parse_duration_arg(text: &str) -> std::result::Result<String, String> {
    let mut fields = text.split(':');
    let valid = matches!(
        (fields.next(), fields.next()),
        (Some(hours), Some(minutes))
            if hours.parse::<u32>().is_ok() && minutes.parse::<u32>().is_ok()
    );
    if valid {
        Ok(text.to_string())
    } else {
        Err(format!("expected a duration like 01:30, got \"{text}\""))
    }
}
