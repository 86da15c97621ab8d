//! Itinerary stops.

use serde_json::{Map, Value};

use super::Timestamp;

/// Auxiliary details (population, presents delivered, photos, ...) carried
/// through the tracker untouched.
pub type Payload = Map<String, Value>;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A single stop on Santa's route, with its arrival and departure already
/// moved into the evaluation year.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Identifier from the source (e.g. "takeoff", "auckland").
    pub id: String,

    /// City name.
    pub city: String,

    /// Region or country.
    pub region: String,

    /// Position, if the source provided one.
    pub location: Option<Coordinates>,

    /// Normalized arrival instant.
    pub arrival: Timestamp,

    /// Normalized departure instant.
    pub departure: Timestamp,

    /// Every other source field, uninterpreted.
    pub payload: Payload,
}

impl Waypoint {
    /// Human-readable "city, region" label.
    pub fn label(&self) -> String {
        match (self.city.is_empty(), self.region.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.region),
            (false, true) => self.city.clone(),
            (true, false) => self.region.clone(),
            (true, true) => self.id.clone(),
        }
    }
}
