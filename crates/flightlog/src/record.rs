//! Core logbook record types.
//!
//! This module defines the flight-log entry itself plus the three
//! supporting registries (pilots, aircraft, airfields) that entries
//! reference by name.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::flight_time::FlightTime;

/// Whether a flight was logged as a day or night flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayNight {
    /// Daytime flight.
    #[default]
    Day,
    /// Night flight.
    Night,
}

impl DayNight {
    /// Parse stored text leniently; anything that is not "night" reads
    /// as [`DayNight::Day`], mirroring how the rest of the logbook
    /// degrades rather than rejects legacy data.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("night") {
            Self::Night
        } else {
            Self::Day
        }
    }
}

impl std::fmt::Display for DayNight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "Day"),
            Self::Night => write!(f, "Night"),
        }
    }
}

/// A single flight-log entry.
///
/// Report generation and statistics only ever read these records; they
/// are created and deleted through the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Unique identifier for this entry (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Calendar date of the flight.
    pub date: NaiveDate,

    /// Name of the pilot in command (or under training).
    pub pilot: String,

    /// Capacity flown in, e.g. "PIC" or "P/UT".
    pub designation: String,

    /// Aircraft registration or identifier, e.g. "G-ABCD".
    pub aircraft: String,

    /// Departure airfield code.
    pub departure: String,

    /// Departure date and time.
    pub departure_time: NaiveDateTime,

    /// Arrival airfield code.
    pub arrival: String,

    /// Arrival date and time.
    pub arrival_time: NaiveDateTime,

    /// Day or night flight.
    pub day_night: DayNight,

    /// Number of takeoffs.
    pub takeoffs: u32,

    /// Number of landings.
    pub landings: u32,

    /// Flight duration as canonical `HH:MM` text.
    pub duration: String,

    /// Free-form remarks.
    pub remarks: String,
}

impl FlightRecord {
    /// The stored duration as a [`FlightTime`].
    ///
    /// Malformed duration text reads as the zero duration; see
    /// [`FlightTime::parse`].
    #[must_use]
    pub fn flight_time(&self) -> FlightTime {
        FlightTime::parse(&self.duration)
    }

    /// The duration implied by the departure and arrival times, rounded
    /// up to the next whole minute.
    #[must_use]
    pub fn computed_duration(&self) -> FlightTime {
        FlightTime::between(self.departure_time, self.arrival_time)
    }
}

/// A pilot known to the logbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    /// Unique identifier (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Full name.
    pub name: String,

    /// Postal address.
    pub address: String,

    /// Contact telephone number.
    pub telephone: String,

    /// Contact email address.
    pub email: String,
}

/// An aircraft known to the logbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Unique identifier (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Registration marking, e.g. "G-ABCD". Unique per aircraft.
    pub registration: String,

    /// Manufacturer, e.g. "Piper".
    pub make: String,

    /// Model, e.g. "PA-28".
    pub model: String,

    /// Type designator, e.g. "P28A".
    pub code: String,

    /// Engine type class, e.g. "SEP".
    pub engine_type: String,
}

/// An airfield known to the logbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airfield {
    /// Unique identifier (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Location code, e.g. "EGLL". Unique per airfield.
    pub code: String,

    /// Human-readable name, e.g. "Heathrow".
    pub name: String,

    /// County or region.
    pub county: String,

    /// Country.
    pub country: String,

    /// Contact telephone number.
    pub telephone: String,

    /// Website address.
    pub website: String,
}
