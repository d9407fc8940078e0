//! Itinerary → forecast → per-day summaries, in one pass.

use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    aggregate,
    error::ForecastError,
    itinerary::Itinerary,
    model::DaySummary,
    present,
    provider::ForecastProvider,
};

/// A destination's forecast could not be obtained; the whole run is abandoned.
#[derive(Debug, Error)]
#[error("Failed to fetch forecast for {destination}")]
pub struct PipelineError {
    pub destination: String,
    #[source]
    pub source: ForecastError,
}

/// Fetch every destination in turn and summarise each visit date.
///
/// The first failing destination aborts the run; no partial results are
/// returned. The result is sorted by date.
#[instrument(skip_all, fields(destinations = itinerary.destinations().len()))]
pub async fn run(
    itinerary: &Itinerary,
    provider: &dyn ForecastProvider,
) -> Result<Vec<DaySummary>, PipelineError> {
    let mut summaries = Vec::with_capacity(itinerary.visit_count());

    for destination in itinerary.destinations() {
        let series = provider.hourly_forecast(destination).await.map_err(|source| {
            PipelineError { destination: destination.name.clone(), source }
        })?;

        summaries.extend(aggregate::summarize(destination, &series));
    }

    present::sort_chronologically(&mut summaries);

    info!(summaries = summaries.len(), "Report ready");
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeSet,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::model::{Destination, HourlySeries};

    /// Serves 16 days of flat 60° readings from Feb 19, except for destinations
    /// named in `failing`.
    #[derive(Debug, Default)]
    struct FakeProvider {
        failing: Vec<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ForecastProvider for FakeProvider {
        async fn hourly_forecast(
            &self,
            destination: &Destination,
        ) -> Result<HourlySeries, ForecastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|name| *name == destination.name) {
                return Err(ForecastError::Parse("boom".to_string()));
            }

            let start = ymd(2, 19).and_hms_opt(0, 0, 0).unwrap().and_utc();
            let hours = 16 * 24;
            Ok(HourlySeries {
                start,
                end: start + Duration::hours(hours as i64),
                interval: Duration::hours(1),
                utc_offset: Duration::zero(),
                temperature: vec![Some(60.0); hours],
                weather_code: Some(vec![Some(2); hours]),
            })
        }
    }

    fn ymd(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn destination(name: &str, dates: &[NaiveDate]) -> Destination {
        Destination {
            name: name.to_string(),
            country: "Italy".to_string(),
            latitude: 41.9,
            longitude: 12.5,
            visit_dates: dates.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[tokio::test]
    async fn two_destinations_three_dates_sorted() {
        let itinerary = Itinerary::new(vec![
            destination("Rome", &[ymd(2, 27), ymd(2, 20)]),
            destination("Palermo", &[ymd(2, 26)]),
        ])
        .unwrap();
        let provider = FakeProvider::default();

        let summaries = run(&itinerary, &provider).await.expect("run should succeed");

        let dates: Vec<_> = summaries.iter().map(|s| s.date.to_string()).collect();
        assert_eq!(dates, ["2026-02-20", "2026-02-26", "2026-02-27"]);
        assert_eq!(summaries[1].city, "Palermo");
        assert!(summaries.iter().all(|s| s.max_temp == Some(60.0)));
        assert!(summaries.iter().all(|s| s.condition_label.as_deref() == Some("Partly cloudy")));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dates_beyond_the_horizon_are_unavailable() {
        let itinerary = Itinerary::new(vec![destination("Paris", &[ymd(3, 3), ymd(3, 10)])]).unwrap();

        let summaries = run(&itinerary, &FakeProvider::default()).await.unwrap();

        assert!(summaries[0].is_available());
        assert!(!summaries[1].is_available());
        assert_eq!(summaries[1].condition_label, None);
    }

    #[tokio::test]
    async fn one_failure_aborts_the_run() {
        let itinerary = Itinerary::new(vec![
            destination("Barcelona", &[ymd(2, 20)]),
            destination("Tunis", &[ymd(2, 25)]),
            destination("Rome", &[ymd(2, 27)]),
        ])
        .unwrap();
        let provider = FakeProvider { failing: vec!["Tunis"], ..Default::default() };

        let err = run(&itinerary, &provider).await.unwrap_err();

        assert_eq!(err.destination, "Tunis");
        assert!(err.to_string().contains("Tunis"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2, "later destinations are not fetched");
    }
}
