use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One itinerary stop: where we are and on which days.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub visit_dates: BTreeSet<NaiveDate>,
}

/// A single hour of forecast data. `None` means the provider had no value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyReading {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub condition_code: Option<i32>,
}

/// Hourly forecast laid out on a half-open grid `[start, end)` with a fixed step.
///
/// Value arrays are indexed by grid position; positions past the end of an
/// array read as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval: Duration,
    /// Offset of the provider's reporting timezone, used to decide which
    /// calendar day an hour belongs to.
    pub utc_offset: Duration,
    pub temperature: Vec<Option<f64>>,
    pub weather_code: Option<Vec<Option<i32>>>,
}

impl HourlySeries {
    /// Number of grid positions in `[start, end)`.
    pub fn len(&self) -> usize {
        let span = (self.end - self.start).num_seconds();
        let step = self.interval.num_seconds();
        if span <= 0 || step <= 0 {
            return 0;
        }
        usize::try_from(span / step).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn readings(&self) -> impl Iterator<Item = HourlyReading> + '_ {
        (0..self.len()).map(move |i| {
            let offset = self.interval * i32::try_from(i).unwrap_or(i32::MAX);
            HourlyReading {
                timestamp: self.start + offset,
                temperature: self
                    .temperature
                    .get(i)
                    .copied()
                    .flatten()
                    .filter(|t| t.is_finite()),
                condition_code: self
                    .weather_code
                    .as_ref()
                    .and_then(|codes| codes.get(i).copied().flatten()),
            }
        })
    }

    /// Calendar date of `timestamp` in the series' reporting timezone.
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        (timestamp + self.utc_offset).date_naive()
    }
}

/// Reduced weather for one destination on one visit date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub city: String,
    pub country: String,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub condition_label: Option<String>,
}

impl DaySummary {
    /// Both temperatures are known.
    pub fn is_available(&self) -> bool {
        self.max_temp.is_some() && self.min_temp.is_some()
    }
}
