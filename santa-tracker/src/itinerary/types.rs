//! Raw route document DTOs.
//!
//! These types mirror the route JSON (`route_santa_en.json`): a top-level
//! `destinations` array of stops with epoch-millisecond `arrival` and
//! `departure` fields. Fields the tracker does not model are collected into
//! `extra` and passed through as the waypoint payload.

use serde::Deserialize;
use serde_json::{Map, Value};

/// The whole route document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItinerary {
    /// Stops, in source order (not necessarily sorted by arrival).
    pub destinations: Vec<RawDestination>,
}

/// A stop as it appears in the source.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDestination {
    /// Stop identifier.
    pub id: String,

    /// Arrival, epoch milliseconds in the source year.
    pub arrival: i64,

    /// Departure, epoch milliseconds in the source year.
    pub departure: i64,

    /// City name.
    #[serde(default)]
    pub city: String,

    /// Region or country name.
    #[serde(default)]
    pub region: String,

    /// Position of the stop.
    pub location: Option<RawLocation>,

    /// Population, presentsDelivered, details, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Source position.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawLocation {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_full_destination() {
        let json = r#"{
            "id": "auckland",
            "arrival": 1545645600000,
            "departure": 1545645660000,
            "population": 1614300,
            "presentsDelivered": 2561442,
            "city": "Auckland",
            "region": "New Zealand",
            "location": {"lat": -36.848461, "lng": 174.763336},
            "details": {"timezone": 46800, "photos": []}
        }"#;

        let dest: RawDestination = serde_json::from_str(json).unwrap();

        assert_eq!(dest.id, "auckland");
        assert_eq!(dest.arrival, 1_545_645_600_000);
        assert_eq!(dest.departure, 1_545_645_660_000);
        assert_eq!(dest.city, "Auckland");
        assert_eq!(dest.region, "New Zealand");
        let location = dest.location.unwrap();
        assert_eq!(location.lat, -36.848461);
        assert_eq!(location.lng, 174.763336);

        assert_eq!(dest.extra.len(), 3);
        assert_eq!(dest.extra["population"], json!(1_614_300));
        assert_eq!(dest.extra["presentsDelivered"], json!(2_561_442));
        assert_eq!(dest.extra["details"]["timezone"], json!(46_800));
    }

    #[test]
    fn deserialize_minimal_destination() {
        let json = r#"{"id": "takeoff", "arrival": 0, "departure": 60000}"#;

        let dest: RawDestination = serde_json::from_str(json).unwrap();

        assert_eq!(dest.id, "takeoff");
        assert!(dest.city.is_empty());
        assert!(dest.region.is_empty());
        assert!(dest.location.is_none());
        assert!(dest.extra.is_empty());
    }

    #[test]
    fn missing_arrival_rejected() {
        let json = r#"{"id": "takeoff", "departure": 60000}"#;
        assert!(serde_json::from_str::<RawDestination>(json).is_err());
    }

    #[test]
    fn string_arrival_rejected() {
        let json = r#"{"id": "takeoff", "arrival": "soon", "departure": 60000}"#;
        assert!(serde_json::from_str::<RawDestination>(json).is_err());
    }
}
