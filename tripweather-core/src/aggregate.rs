//! Reduce an hourly series to one summary per visit date.

use chrono::NaiveDate;

use crate::{
    condition,
    model::{DaySummary, Destination, HourlySeries},
};

/// Raw per-day reduction, before any labelling or rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayAggregate {
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub condition_code: Option<i32>,
}

/// Aggregate all hours of `series` whose local date is `date`.
///
/// A date outside the series yields an all-`None` aggregate.
pub fn aggregate_day(series: &HourlySeries, date: NaiveDate) -> DayAggregate {
    let mut max_temp: Option<f64> = None;
    let mut min_temp: Option<f64> = None;
    let mut codes = Vec::new();

    for reading in series
        .readings()
        .filter(|r| series.local_date(r.timestamp) == date)
    {
        if let Some(t) = reading.temperature {
            max_temp = Some(max_temp.map_or(t, |m| m.max(t)));
            min_temp = Some(min_temp.map_or(t, |m| m.min(t)));
        }
        if let Some(code) = reading.condition_code {
            codes.push(code);
        }
    }

    let condition_code = if codes.is_empty() {
        None
    } else {
        condition::worst(&codes)
    };

    DayAggregate { max_temp, min_temp, condition_code }
}

/// Summaries for every visit date of `destination`, in date order.
pub fn summarize(destination: &Destination, series: &HourlySeries) -> Vec<DaySummary> {
    destination
        .visit_dates
        .iter()
        .map(|&date| {
            let day = aggregate_day(series, date);
            DaySummary {
                date,
                city: destination.name.clone(),
                country: destination.country.clone(),
                max_temp: day.max_temp,
                min_temp: day.min_temp,
                condition_label: day.condition_code.map(|c| condition::describe(c).to_string()),
            }
        })
        .collect()
}
