//! Itinerary file loading and validation.
//!
//! Example TOML:
//! ```toml
//! [destinations.rome]
//! name = "Rome"
//! country = "Italy"
//! latitude = 41.9028
//! longitude = 12.4964
//! dates = ["2026-02-27"]
//! ```

use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};
use tracing::{debug, info};

use crate::model::Destination;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItineraryFile {
    destinations: BTreeMap<String, DestinationEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DestinationEntry {
    name: String,
    country: String,
    latitude: f64,
    longitude: f64,
    dates: Vec<NaiveDate>,
}

/// Validated list of destinations, in file-key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    destinations: Vec<Destination>,
}

impl Itinerary {
    /// Build an itinerary, rejecting it as a whole if any destination is invalid.
    pub fn new(destinations: Vec<Destination>) -> Result<Self> {
        ensure!(!destinations.is_empty(), "Itinerary contains no destinations");
        for destination in &destinations {
            validate(destination)?;
        }
        Ok(Self { destinations })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ItineraryFile = toml::from_str(contents).context("Malformed itinerary")?;

        let destinations = file
            .destinations
            .into_iter()
            .map(|(key, entry)| {
                ensure!(!entry.dates.is_empty(), "Destination '{key}' has no visit dates");
                Ok(Destination {
                    name: entry.name,
                    country: entry.country,
                    latitude: entry.latitude,
                    longitude: entry.longitude,
                    visit_dates: entry.dates.into_iter().collect::<BTreeSet<_>>(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(destinations)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read itinerary file: {}", path.display()))?;

        let itinerary = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid itinerary file: {}", path.display()))?;

        info!(
            path = %path.display(),
            destinations = itinerary.destinations.len(),
            visits = itinerary.visit_count(),
            "Itinerary loaded"
        );
        Ok(itinerary)
    }

    /// Load from `primary`, or from `fallback` when `primary` does not exist.
    pub fn load_with_fallback(primary: &Path, fallback: Option<&Path>) -> Result<Self> {
        match fallback {
            Some(fallback) if !primary.exists() => {
                debug!(
                    primary = %primary.display(),
                    fallback = %fallback.display(),
                    "Itinerary not found at primary path, using fallback"
                );
                Self::load(fallback)
            }
            _ => Self::load(primary),
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Total number of (destination, date) pairs.
    pub fn visit_count(&self) -> usize {
        self.destinations.iter().map(|d| d.visit_dates.len()).sum()
    }
}

fn validate(destination: &Destination) -> Result<()> {
    let name = &destination.name;
    ensure!(!name.trim().is_empty(), "Destination name must not be empty");
    ensure!(
        (-90.0..=90.0).contains(&destination.latitude),
        "Destination '{name}': latitude {} is outside -90..=90",
        destination.latitude
    );
    ensure!(
        (-180.0..=180.0).contains(&destination.longitude),
        "Destination '{name}': longitude {} is outside -180..=180",
        destination.longitude
    );
    ensure!(!destination.visit_dates.is_empty(), "Destination '{name}' has no visit dates");
    Ok(())
}
