//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase and instants are epoch milliseconds, matching
//! what the map front-end already consumes.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, Payload, Waypoint};
use crate::itinerary::{DataError, Visited};
use crate::tracker::{ClockSource, LoadSummary, Resolved};

/// Query string carrying an optional evaluation time.
#[derive(Debug, Default, Deserialize)]
pub struct TimeQuery {
    /// Epoch milliseconds or RFC 3339 (defaults to now)
    pub time: Option<String>,
}

/// Position of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationView {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinates> for LocationView {
    fn from(c: Coordinates) -> Self {
        Self { lat: c.lat, lng: c.lng }
    }
}

/// A stop as sent to the front-end.
///
/// Payload fields (population, presentsDelivered, details, ...) are
/// flattened next to the core fields, as they were in the source document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointView {
    pub id: String,
    pub city: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationView>,
    /// Normalized arrival (epoch ms)
    pub arrival: i64,
    /// Normalized departure (epoch ms)
    pub departure: i64,
    #[serde(flatten)]
    pub payload: Payload,
}

impl WaypointView {
    /// Build a view from a domain waypoint.
    pub fn from_waypoint(waypoint: &Waypoint) -> Self {
        Self {
            id: waypoint.id.clone(),
            city: waypoint.city.clone(),
            region: waypoint.region.clone(),
            location: waypoint.location.map(LocationView::from),
            arrival: waypoint.arrival.as_millis(),
            departure: waypoint.departure.as_millis(),
            payload: waypoint.payload.clone(),
        }
    }
}

/// Response to a load or reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadResponse {
    pub ok: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoadResponse {
    /// Build from a load outcome.
    pub fn from_result(result: &Result<LoadSummary, DataError>) -> Self {
        match result {
            Ok(summary) => Self {
                ok: true,
                count: summary.count,
                error: None,
            },
            Err(e) => Self {
                ok: false,
                count: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Santa's current position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub found: bool,
    /// Instant the lookup was evaluated at (epoch ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_instant: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoint: Option<WaypointView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_iso: Option<String>,
}

impl LocationResponse {
    /// Santa found at a stop.
    pub fn found(resolved: &Resolved) -> Self {
        Self {
            found: true,
            query_time: Some(resolved.query_time.as_millis()),
            arrival_instant: Some(resolved.arrival.as_millis()),
            waypoint: Some(WaypointView::from_waypoint(&resolved.waypoint)),
            arrival_iso: Some(resolved.arrival_iso.clone()),
        }
    }

    /// No stop reached yet.
    pub fn not_found() -> Self {
        Self {
            found: false,
            query_time: None,
            arrival_instant: None,
            waypoint: None,
            arrival_iso: None,
        }
    }
}

/// A visited stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitedEntry {
    pub arrival_instant: i64,
    pub waypoint: WaypointView,
}

impl VisitedEntry {
    /// Build from a domain visit.
    pub fn from_visited(visited: &Visited) -> Self {
        Self {
            arrival_instant: visited.arrival.as_millis(),
            waypoint: WaypointView::from_waypoint(&visited.waypoint),
        }
    }
}

/// Request to change the clock mode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockRequest {
    /// Simulation start (epoch ms); `null` switches back to real time
    pub override_start: Option<i64>,
}

/// Current clock mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockResponse {
    pub override_start: Option<i64>,
    pub simulated: bool,
    /// Minutes the simulated clock has advanced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_minutes: Option<i64>,
}

impl ClockResponse {
    /// Describe a clock source.
    pub fn from_clock(clock: &ClockSource) -> Self {
        Self {
            override_start: clock.config().override_start.map(|t| t.as_millis()),
            simulated: clock.is_simulated(),
            offset_minutes: clock.offset_minutes(),
        }
    }
}

/// Settings a polling front-end needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub data_file: String,
    pub update_interval_secs: u64,
    pub simulated: bool,
    pub location_count: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use serde_json::json;
    use std::sync::Arc;

    fn waypoint() -> Waypoint {
        let mut payload = Payload::new();
        payload.insert("population".to_string(), json!(1_614_300));
        payload.insert("details".to_string(), json!({"timezone": 46800}));
        Waypoint {
            id: "auckland".to_string(),
            city: "Auckland".to_string(),
            region: "New Zealand".to_string(),
            location: Some(Coordinates {
                lat: -36.5,
                lng: 174.75,
            }),
            arrival: Timestamp::from_millis(1_000),
            departure: Timestamp::from_millis(61_000),
            payload,
        }
    }

    #[test]
    fn waypoint_view_flattens_payload() {
        let value = serde_json::to_value(WaypointView::from_waypoint(&waypoint())).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "auckland",
                "city": "Auckland",
                "region": "New Zealand",
                "location": {"lat": -36.5, "lng": 174.75},
                "arrival": 1000,
                "departure": 61000,
                "population": 1614300,
                "details": {"timezone": 46800}
            })
        );
    }

    #[test]
    fn waypoint_view_omits_missing_location() {
        let mut w = waypoint();
        w.location = None;

        let value = serde_json::to_value(WaypointView::from_waypoint(&w)).unwrap();
        assert!(value.get("location").is_none());
    }

    #[test]
    fn location_response_found() {
        let resolved = Resolved {
            query_time: Timestamp::from_millis(5_000),
            arrival: Timestamp::from_millis(1_000),
            waypoint: Arc::new(waypoint()),
            arrival_iso: "1970-01-01T00:00:01.000Z".to_string(),
        };

        let value = serde_json::to_value(LocationResponse::found(&resolved)).unwrap();

        assert_eq!(value["found"], json!(true));
        assert_eq!(value["queryTime"], json!(5000));
        assert_eq!(value["arrivalInstant"], json!(1000));
        assert_eq!(value["arrivalIso"], json!("1970-01-01T00:00:01.000Z"));
        assert_eq!(value["waypoint"]["city"], json!("Auckland"));
    }

    #[test]
    fn location_response_not_found_is_sparse() {
        let value = serde_json::to_value(LocationResponse::not_found()).unwrap();
        assert_eq!(value, json!({"found": false}));
    }

    #[test]
    fn load_response_from_result() {
        let ok = LoadResponse::from_result(&Ok(LoadSummary {
            count: 3,
            year: 2025,
        }));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"ok": true, "count": 3})
        );

        let err = LoadResponse::from_result(&Err(DataError::MissingCollection("destinations")));
        assert!(!err.ok);
        assert_eq!(
            err.error.as_deref(),
            Some("itinerary has no `destinations` collection")
        );
    }

    #[test]
    fn clock_request_accepts_null() {
        let req: ClockRequest = serde_json::from_str(r#"{"overrideStart": null}"#).unwrap();
        assert_eq!(req.override_start, None);

        let req: ClockRequest = serde_json::from_str(r#"{"overrideStart": 1000}"#).unwrap();
        assert_eq!(req.override_start, Some(1000));

        let req: ClockRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.override_start, None);
    }
}
