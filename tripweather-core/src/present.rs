//! Ordering and rendering of day summaries.

use serde::{Deserialize, Serialize};

use crate::{config::TemperatureUnit, model::DaySummary};

/// Which flavour of report to produce.
///
/// `Baseline` reports temperatures only, to one decimal place. `Extended`
/// also requests condition codes, adds a `weather` label and rounds to whole
/// degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportVariant {
    Baseline,
    #[default]
    Extended,
}

impl ReportVariant {
    pub const fn includes_condition(self) -> bool {
        matches!(self, Self::Extended)
    }

    pub const fn default_precision(self) -> u32 {
        match self {
            Self::Baseline => 1,
            Self::Extended => 0,
        }
    }
}

/// Most decimal places a temperature is rendered with.
pub const MAX_PRECISION: u32 = 15;

/// Everything the presenter needs to know besides the summaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub variant: ReportVariant,
    /// Decimal places shown for temperatures.
    pub precision: u32,
    pub unit: TemperatureUnit,
}

impl ReportOptions {
    pub fn new(variant: ReportVariant) -> Self {
        Self { variant, precision: variant.default_precision(), unit: TemperatureUnit::default() }
    }

    /// Clamped to [`MAX_PRECISION`].
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.min(MAX_PRECISION);
        self
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new(ReportVariant::default())
    }
}

/// One element of the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    /// ISO 8601 calendar date.
    pub date: String,
    pub city: String,
    pub country: String,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    /// Outer `None` drops the key (baseline); inner `None` renders `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<Option<String>>,
}

/// Stable sort by date; summaries sharing a date keep their relative order.
pub fn sort_chronologically(summaries: &mut [DaySummary]) {
    summaries.sort_by_key(|s| s.date);
}

/// Round half to even at `decimals` places (at most [`MAX_PRECISION`]),
/// never yielding `-0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let exponent = decimals.min(MAX_PRECISION) as i32;
    let factor = 10f64.powi(exponent);
    (value * factor).round_ties_even() / factor + 0.0
}

pub fn to_record(summary: &DaySummary, options: &ReportOptions) -> SummaryRecord {
    let round = |t: Option<f64>| t.map(|v| round_to(v, options.precision));

    SummaryRecord {
        date: summary.date.format("%Y-%m-%d").to_string(),
        city: summary.city.clone(),
        country: summary.country.clone(),
        max_temp: round(summary.max_temp),
        min_temp: round(summary.min_temp),
        weather: options.variant.includes_condition().then(|| summary.condition_label.clone()),
    }
}

pub fn to_records(summaries: &[DaySummary], options: &ReportOptions) -> Vec<SummaryRecord> {
    summaries.iter().map(|s| to_record(s, options)).collect()
}

pub fn to_json(summaries: &[DaySummary], options: &ReportOptions) -> serde_json::Result<String> {
    serde_json::to_string(&to_records(summaries, options))
}

/// Console line for one summary, e.g.
/// `Paris (Mar 03): Slight rain, High: 52°F, Low: 41°F`.
pub fn render_line(summary: &DaySummary, options: &ReportOptions) -> String {
    let day = summary.date.format("%b %d");

    let (Some(max), Some(min)) = (summary.max_temp, summary.min_temp) else {
        return format!("{} ({day}): Unavailable", summary.city);
    };

    let precision = options.precision as usize;
    let unit = options.unit.symbol();
    let temps = format!(
        "High: {:.precision$}{unit}, Low: {:.precision$}{unit}",
        round_to(max, options.precision),
        round_to(min, options.precision),
    );

    match summary.condition_label.as_deref() {
        Some(label) if options.variant.includes_condition() => {
            format!("{} ({day}): {label}, {temps}", summary.city)
        }
        _ => format!("{} ({day}): {temps}", summary.city),
    }
}

pub fn render_lines(summaries: &[DaySummary], options: &ReportOptions) -> Vec<String> {
    summaries.iter().map(|s| render_line(s, options)).collect()
}
