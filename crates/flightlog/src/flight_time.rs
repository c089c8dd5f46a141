//! Flight duration values.
//!
//! This module defines the `HH:MM` time-span type used throughout the
//! logbook: parsing from stored text, integer-minute arithmetic, and the
//! canonical zero-padded rendering.

use chrono::NaiveDateTime;

/// An elapsed flight time in hours and minutes.
///
/// The minutes component is always normalized into `[0, 59]`; overflow
/// carries into hours. Ordering is by total minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightTime {
    hours: u32,
    minutes: u32,
}

impl FlightTime {
    /// The zero duration, `00:00`.
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
    };

    /// Create a flight time, carrying minute overflow into hours.
    #[must_use]
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self {
            hours: hours.saturating_add(minutes / 60),
            minutes: minutes % 60,
        }
    }

    /// Parse `HH:MM` text into a flight time.
    ///
    /// This is deliberately lossy: text without a separator (including the
    /// empty string) parses as zero, and each field that fails numeric
    /// conversion contributes zero. Callers that need to reject malformed
    /// input must validate before storing; existing logbook data is read
    /// with this fallback so a bad row can never poison an aggregate.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut fields = text.split(':');
        match (fields.next(), fields.next()) {
            (Some(hours), Some(minutes)) => {
                Self::new(hours.parse().unwrap_or(0), minutes.parse().unwrap_or(0))
            }
            _ => Self::ZERO,
        }
    }

    /// Build a flight time from a total minute count.
    #[must_use]
    pub fn from_minutes(total: u32) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    /// Elapsed time between departure and arrival, rounded up to the next
    /// whole minute. Zero or negative intervals yield the zero duration.
    #[must_use]
    pub fn between(departure: NaiveDateTime, arrival: NaiveDateTime) -> Self {
        let seconds = (arrival - departure).num_seconds();
        if seconds <= 0 {
            return Self::ZERO;
        }
        let minutes = u64::try_from(seconds).unwrap_or(0).div_ceil(60);
        Self::from_minutes(u32::try_from(minutes).unwrap_or(u32::MAX))
    }

    /// The hours component.
    #[must_use]
    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// The minutes component, always in `[0, 59]`.
    #[must_use]
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Total duration in minutes.
    #[must_use]
    pub fn total_minutes(&self) -> u32 {
        self.hours.saturating_mul(60).saturating_add(self.minutes)
    }

    /// Check whether this is the zero duration.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }
}

impl std::fmt::Display for FlightTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}
