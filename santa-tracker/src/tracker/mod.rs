//! Location resolver.
//!
//! [`Tracker`] ties the itinerary store to the clock source and answers the
//! four questions a front-end asks: load this route, list every stop, where
//! is Santa now, and where has he been. It is a plain synchronous value;
//! callers that share it across tasks wrap it in a lock.

mod clock;
mod config;

pub use clock::{ClockConfig, ClockSource};
pub use config::{ConfigError, DEFAULT_DATA_FILE, TrackerConfig};

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Timestamp, Waypoint};
use crate::itinerary::{
    DataError, IntegrityFault, Itinerary, ItineraryStore, RawItinerary, Visited, read_file,
};

/// Result of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of stops loaded.
    pub count: usize,

    /// Year the stops were normalized into.
    pub year: i32,
}

/// Santa's resolved position.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Instant the lookup was evaluated at (after any override).
    pub query_time: Timestamp,

    /// Arrival instant of the current stop.
    pub arrival: Timestamp,

    /// The current stop.
    pub waypoint: Arc<Waypoint>,

    /// `arrival` as ISO 8601.
    pub arrival_iso: String,
}

/// The temporal-lookup engine.
#[derive(Debug, Default)]
pub struct Tracker {
    store: ItineraryStore,
    clock: ClockSource,
}

impl Tracker {
    /// Create an empty tracker with the given clock.
    pub fn new(clock: ClockConfig) -> Self {
        Self {
            store: ItineraryStore::new(),
            clock: ClockSource::new(clock),
        }
    }

    /// Create an empty tracker from full configuration.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.clock())
    }

    /// Replace the itinerary.
    ///
    /// `wall` is the caller's wall clock; the clock source turns it into the
    /// evaluation year. On error the previous itinerary stays loaded.
    pub fn load(&mut self, raw: RawItinerary, wall: Timestamp) -> Result<LoadSummary, DataError> {
        let year = self
            .clock
            .evaluation_year(wall)
            .map_err(DataError::EvaluationYear)?;

        let count = self.store.load(raw, year).inspect_err(|e| {
            warn!(error = %e, "itinerary load failed, keeping previous itinerary");
        })?;

        Ok(LoadSummary { count, year })
    }

    /// Parse and load a JSON route document.
    pub fn load_json(&mut self, text: &str, wall: Timestamp) -> Result<LoadSummary, DataError> {
        let raw = RawItinerary::from_json(text).inspect_err(|e| {
            warn!(error = %e, "rejected itinerary document");
        })?;
        self.load(raw, wall)
    }

    /// Read and load a route document from disk.
    pub fn load_file(&mut self, path: &Path, wall: Timestamp) -> Result<LoadSummary, DataError> {
        let raw = read_file(path).inspect_err(|e| {
            warn!(error = %e, "cannot read itinerary file");
        })?;
        self.load(raw, wall)
    }

    /// Every stop, normalized, in source order.
    pub fn all(&self) -> Vec<Arc<Waypoint>> {
        self.store.all()
    }

    /// Stops reached at or before `query`, ascending by arrival.
    ///
    /// `query` is used as given; the clock override does not apply.
    pub fn visited(&self, query: Timestamp) -> Vec<Visited> {
        self.store.visited(query)
    }

    /// Where Santa is, given the caller's wall clock.
    ///
    /// `Ok(None)` means nothing has been reached yet (or nothing is loaded).
    /// An [`IntegrityFault`] means the index and the stops disagree.
    pub fn resolve(&mut self, wall: Timestamp) -> Result<Option<Resolved>, IntegrityFault> {
        let query_time = self.clock.query_time(wall);
        debug!(query = %query_time, millis = query_time.as_millis(), "resolving location");

        let Some(found) = self.store.locate(query_time)? else {
            debug!("no location found");
            return Ok(None);
        };

        debug!(
            at = %found.waypoint.label(),
            arrival = %found.arrival,
            "santa located"
        );

        Ok(Some(Resolved {
            query_time,
            arrival: found.arrival,
            arrival_iso: found.arrival.to_iso8601(),
            waypoint: found.waypoint,
        }))
    }

    /// Change the clock configuration.
    pub fn configure_clock(&mut self, config: ClockConfig) {
        self.clock.configure(config);
    }

    /// The clock source.
    pub fn clock(&self) -> &ClockSource {
        &self.clock
    }

    /// The current itinerary snapshot.
    pub fn itinerary(&self) -> Arc<Itinerary> {
        self.store.snapshot()
    }

    /// Number of stops loaded.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if no stops are loaded.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
