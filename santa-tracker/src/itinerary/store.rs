//! Normalized itinerary snapshots and the store that swaps them.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::{Timestamp, Waypoint};

use super::arrivals_index::ArrivalsIndex;
use super::convert::normalize_itinerary;
use super::error::DataError;
use super::types::RawItinerary;

/// The index holds an arrival that no stored waypoint owns.
///
/// This never happens for snapshots built by [`Itinerary::build`]; seeing it
/// means the index and the waypoint table were assembled inconsistently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("arrival {arrival} is indexed but has no stored waypoint")]
pub struct IntegrityFault {
    pub arrival: Timestamp,
}

/// A waypoint reached by some query time.
#[derive(Debug, Clone, PartialEq)]
pub struct Visited {
    pub arrival: Timestamp,
    pub waypoint: Arc<Waypoint>,
}

/// One fully built, immutable itinerary: waypoints in source order, the
/// arrival → waypoint table, and the sorted arrivals index.
#[derive(Debug, Default)]
pub struct Itinerary {
    waypoints: Vec<Arc<Waypoint>>,

    /// Arrival → position in `waypoints`. For duplicate arrivals the stop
    /// loaded last wins.
    by_arrival: HashMap<Timestamp, usize>,

    index: ArrivalsIndex,

    /// Calendar year the arrivals were normalized into.
    year: Option<i32>,
}

impl Itinerary {
    /// Build a snapshot from normalized waypoints.
    pub fn build(waypoints: Vec<Waypoint>, year: i32) -> Self {
        let waypoints: Vec<Arc<Waypoint>> = waypoints.into_iter().map(Arc::new).collect();

        let mut by_arrival = HashMap::with_capacity(waypoints.len());
        for (idx, waypoint) in waypoints.iter().enumerate() {
            if let Some(previous) = by_arrival.insert(waypoint.arrival, idx) {
                debug!(
                    arrival = %waypoint.arrival,
                    replaced = %waypoints[previous].id,
                    by = %waypoint.id,
                    "duplicate arrival, later stop wins"
                );
            }
        }

        let index = ArrivalsIndex::from_arrivals(waypoints.iter().map(|w| w.arrival));

        Self {
            waypoints,
            by_arrival,
            index,
            year: Some(year),
        }
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if the itinerary has no stops.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Year the itinerary was normalized into, or `None` before any load.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Stops in source order.
    pub fn waypoints(&self) -> &[Arc<Waypoint>] {
        &self.waypoints
    }

    /// The sorted arrivals index.
    pub fn index(&self) -> &ArrivalsIndex {
        &self.index
    }

    /// The stop currently associated with an arrival instant.
    pub fn waypoint_at(&self, arrival: Timestamp) -> Option<&Arc<Waypoint>> {
        self.by_arrival.get(&arrival).map(|&idx| &self.waypoints[idx])
    }

    /// The stop Santa is at (or last left) at `query`.
    ///
    /// `Ok(None)` when nothing has been reached yet.
    pub fn locate(&self, query: Timestamp) -> Result<Option<Visited>, IntegrityFault> {
        let Some(arrival) = self.index.find_current(query) else {
            return Ok(None);
        };

        match self.waypoint_at(arrival) {
            Some(waypoint) => Ok(Some(Visited {
                arrival,
                waypoint: waypoint.clone(),
            })),
            None => {
                let fault = IntegrityFault { arrival };
                error!(%fault, "arrivals index out of sync with waypoints");
                Err(fault)
            }
        }
    }

    /// Stops reached at or before `query`, in ascending arrival order.
    ///
    /// Duplicate arrival instants yield a single entry. Relies on the index
    /// being sorted, which holds for every built snapshot.
    pub fn visited(&self, query: Timestamp) -> Vec<Visited> {
        let reached = self.index.reached_by(query);
        let mut visited: Vec<Visited> = Vec::with_capacity(reached.len());

        for &arrival in reached {
            if visited.last().is_some_and(|v| v.arrival == arrival) {
                continue;
            }
            match self.waypoint_at(arrival) {
                Some(waypoint) => visited.push(Visited {
                    arrival,
                    waypoint: waypoint.clone(),
                }),
                None => error!(%arrival, "indexed arrival has no waypoint, skipping"),
            }
        }

        visited
    }

    #[cfg(test)]
    pub(crate) fn from_parts(waypoints: Vec<Waypoint>, index: ArrivalsIndex) -> Self {
        let waypoints: Vec<Arc<Waypoint>> = waypoints.into_iter().map(Arc::new).collect();
        let by_arrival = waypoints
            .iter()
            .enumerate()
            .map(|(idx, w)| (w.arrival, idx))
            .collect();
        Self {
            waypoints,
            by_arrival,
            index,
            year: None,
        }
    }
}

/// Holder of the current itinerary snapshot.
///
/// Loads build a complete new [`Itinerary`] and replace the old one with a
/// single assignment. A failed load leaves the previous snapshot in place.
#[derive(Debug, Default)]
pub struct ItineraryStore {
    current: Arc<Itinerary>,
}

impl ItineraryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `raw` into `year` and make it the current itinerary.
    ///
    /// Returns the number of stops loaded.
    pub fn load(&mut self, raw: RawItinerary, year: i32) -> Result<usize, DataError> {
        let waypoints = normalize_itinerary(raw, year)?;
        let itinerary = Itinerary::build(waypoints, year);
        let count = itinerary.len();

        self.current = Arc::new(itinerary);
        info!(count, year, "itinerary loaded");

        Ok(count)
    }

    /// The current snapshot. Stays valid across later reloads.
    pub fn snapshot(&self) -> Arc<Itinerary> {
        Arc::clone(&self.current)
    }

    /// All stops in source order.
    pub fn all(&self) -> Vec<Arc<Waypoint>> {
        self.current.waypoints().to_vec()
    }

    /// Stops reached at or before `query`.
    pub fn visited(&self, query: Timestamp) -> Vec<Visited> {
        self.current.visited(query)
    }

    /// The stop Santa is at (or last left) at `query`.
    pub fn locate(&self, query: Timestamp) -> Result<Option<Visited>, IntegrityFault> {
        self.current.locate(query)
    }

    /// Number of stops in the current snapshot.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Check if no stops are loaded.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
