//! Flight statistics.
//!
//! Aggregates a logbook's records into the six summary figures shown by
//! the totals view. All arithmetic is integer minutes; display strings
//! are produced fresh on each call and never fed back into calculations.

use serde::Serialize;

use crate::flight_time::FlightTime;
use crate::record::FlightRecord;

/// A single labeled statistic, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightStatistic {
    /// Display label, e.g. "Total Hours".
    pub label: &'static str,
    /// Formatted display value, e.g. "04:00".
    pub value: String,
}

/// Summary totals over a sequence of flight records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightTotals {
    /// Number of records aggregated.
    pub flights: usize,
    /// Sum of all flight durations.
    pub total: FlightTime,
    /// Duration of the longest flight (first record wins a tie).
    pub longest: FlightTime,
    /// Duration of the shortest flight (first record wins a tie).
    pub shortest: FlightTime,
    /// Mean duration, truncated to whole minutes.
    pub average: FlightTime,
}

impl FlightTotals {
    /// Aggregate the given records.
    ///
    /// Durations are read through the lossy parser, so a malformed entry
    /// contributes zero minutes rather than failing the whole aggregate.
    /// An empty sequence yields count 0 with every duration `00:00`.
    #[must_use]
    pub fn from_records(records: &[FlightRecord]) -> Self {
        let minutes: Vec<u32> = records
            .iter()
            .map(|record| record.flight_time().total_minutes())
            .collect();

        let flights = minutes.len();
        let total_minutes: u64 = minutes.iter().map(|&m| u64::from(m)).sum();
        let total = FlightTime::from_minutes(clamp_minutes(total_minutes));

        let (shortest, longest) = match extremes(&minutes) {
            Some((lo, hi)) => (
                FlightTime::from_minutes(minutes[lo]),
                FlightTime::from_minutes(minutes[hi]),
            ),
            None => (FlightTime::ZERO, FlightTime::ZERO),
        };

        let average = if flights == 0 {
            FlightTime::ZERO
        } else {
            let count = u64::try_from(flights).unwrap_or(u64::MAX);
            FlightTime::from_minutes(clamp_minutes(total_minutes / count))
        };

        Self {
            flights,
            total,
            longest,
            shortest,
            average,
        }
    }

    /// Total hours as a one-decimal figure, e.g. "4.0" for 240 minutes.
    ///
    /// Rounded to the nearest tenth, half away from zero. Computed over
    /// integer tenths: float formatting rounds ties to even and would
    /// print 15 minutes (0.25h) as "0.2".
    #[must_use]
    pub fn total_hours_decimal(&self) -> String {
        let tenths = (u64::from(self.total.total_minutes()) * 10 + 30) / 60;
        format!("{}.{}", tenths / 10, tenths % 10)
    }

    /// The six display statistics, in presentation order.
    #[must_use]
    pub fn statistics(&self) -> Vec<FlightStatistic> {
        vec![
            FlightStatistic {
                label: "Total Flights",
                value: self.flights.to_string(),
            },
            FlightStatistic {
                label: "Total Hours",
                value: self.total.to_string(),
            },
            FlightStatistic {
                label: "Total Hours Decimal",
                value: self.total_hours_decimal(),
            },
            FlightStatistic {
                label: "Longest Flight",
                value: self.longest.to_string(),
            },
            FlightStatistic {
                label: "Shortest Flight",
                value: self.shortest.to_string(),
            },
            FlightStatistic {
                label: "Average Flight Duration",
                value: self.average.to_string(),
            },
        ]
    }
}

fn clamp_minutes(minutes: u64) -> u32 {
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Indexes of the shortest and longest entries, first occurrence winning
/// any tie. `None` for an empty slice.
fn extremes(minutes: &[u32]) -> Option<(usize, usize)> {
    let mut iter = minutes.iter().enumerate();
    let (_, &first) = iter.next()?;
    let mut shortest = 0;
    let mut longest = 0;
    let mut min = first;
    let mut max = first;
    for (index, &value) in iter {
        if value < min {
            min = value;
            shortest = index;
        }
        if value > max {
            max = value;
            longest = index;
        }
    }
    Some((shortest, longest))
}
