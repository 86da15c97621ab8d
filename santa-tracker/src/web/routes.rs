//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::Timestamp;
use crate::itinerary::DataError;
use crate::tracker::{ClockConfig, LoadSummary};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/config", get(get_config))
        .route("/api/itinerary", post(load_itinerary))
        .route("/api/itinerary/reload", post(reload_itinerary))
        .route("/api/locations", get(all_locations))
        .route("/api/location", get(current_location))
        .route("/api/visited", get(visited_locations))
        .route("/api/clock", get(get_clock).put(set_clock))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Poll interval and mode for the front-end.
async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let tracker = state.tracker.read().await;

    Json(ConfigResponse {
        data_file: state.config.data_file.display().to_string(),
        update_interval_secs: state.config.update_interval_secs,
        simulated: tracker.clock().is_simulated(),
        location_count: tracker.len(),
    })
}

/// Load an itinerary posted as a JSON route document.
async fn load_itinerary(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<LoadResponse>) {
    // Read the body ourselves so a bad document becomes `ok: false`, not a
    // generic extractor rejection
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "itinerary body is not UTF-8");
            let response = LoadResponse {
                ok: false,
                count: 0,
                error: Some(format!("body is not UTF-8: {e}")),
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(response));
        }
    };

    let result = state.tracker.write().await.load_json(text, Timestamp::now());
    load_response(result)
}

/// Reload the configured data file.
async fn reload_itinerary(State(state): State<AppState>) -> (StatusCode, Json<LoadResponse>) {
    let path = &state.config.data_file;
    let result = state.tracker.write().await.load_file(path, Timestamp::now());

    if let Ok(summary) = &result {
        info!(path = %path.display(), count = summary.count, "itinerary reloaded");
    }
    load_response(result)
}

fn load_response(result: Result<LoadSummary, DataError>) -> (StatusCode, Json<LoadResponse>) {
    let status = if result.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(LoadResponse::from_result(&result)))
}

/// Every stop, normalized.
async fn all_locations(State(state): State<AppState>) -> Json<Vec<WaypointView>> {
    let waypoints = state.tracker.read().await.all();

    Json(
        waypoints
            .iter()
            .map(|w| WaypointView::from_waypoint(w))
            .collect(),
    )
}

/// Santa's current location.
async fn current_location(
    State(state): State<AppState>,
    Query(req): Query<TimeQuery>,
) -> Result<Json<LocationResponse>, AppError> {
    let wall = parse_time(req.time.as_deref())?;

    let resolved = state
        .tracker
        .write()
        .await
        .resolve(wall)
        .map_err(|fault| AppError::Internal {
            message: fault.to_string(),
        })?;

    let response = match resolved {
        Some(resolved) => LocationResponse::found(&resolved),
        None => LocationResponse::not_found(),
    };

    Ok(Json(response))
}

/// Stops Santa has visited by the given time.
async fn visited_locations(
    State(state): State<AppState>,
    Query(req): Query<TimeQuery>,
) -> Result<Json<Vec<VisitedEntry>>, AppError> {
    let query = parse_time(req.time.as_deref())?;
    let visited = state.tracker.read().await.visited(query);

    Ok(Json(visited.iter().map(VisitedEntry::from_visited).collect()))
}

/// Current clock mode.
async fn get_clock(State(state): State<AppState>) -> Json<ClockResponse> {
    let tracker = state.tracker.read().await;
    Json(ClockResponse::from_clock(tracker.clock()))
}

/// Switch between real time and simulation.
async fn set_clock(
    State(state): State<AppState>,
    Json(req): Json<ClockRequest>,
) -> Json<ClockResponse> {
    let config = ClockConfig {
        override_start: req.override_start.map(Timestamp::from_millis),
    };

    let mut tracker = state.tracker.write().await;
    tracker.configure_clock(config);
    info!(override_start = ?config.override_start, "clock reconfigured");

    Json(ClockResponse::from_clock(tracker.clock()))
}

/// Parse the `time` query parameter, defaulting to the wall clock.
fn parse_time(time: Option<&str>) -> Result<Timestamp, AppError> {
    match time {
        None | Some("") => Ok(Timestamp::now()),
        Some(raw) => Timestamp::parse(raw).map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Tracker, TrackerConfig};
    use tempfile::tempdir;

    /// Three stops: A on 1 Jan 00:00, B on 1 Jan 12:00, C on 2 Jan 00:00,
    /// recorded in 2019 and normalized into the year of [`WALL`].
    const ROUTE: &str = r#"{"destinations": [
        {"id": "C", "arrival": 1546387200000, "departure": 1546387260000, "city": "Gamma", "region": "Zone"},
        {"id": "A", "arrival": 1546300800000, "departure": 1546300860000, "city": "Alpha", "region": "Zone",
         "location": {"lat": 1.5, "lng": 2.5}, "population": 42},
        {"id": "B", "arrival": 1546344000000, "departure": 1546344060000, "city": "Beta", "region": "Zone"}
    ]}"#;

    fn state() -> AppState {
        AppState::new(Tracker::default(), TrackerConfig::default())
    }

    /// Wall clock the fixture is loaded at; stops land in 2025.
    const WALL: &str = "2025-03-01T00:00:00Z";

    fn millis(s: &str) -> String {
        Timestamp::parse(s).unwrap().as_millis().to_string()
    }

    fn at(time: String) -> Query<TimeQuery> {
        Query(TimeQuery { time: Some(time) })
    }

    fn loaded_state() -> AppState {
        let mut tracker = Tracker::default();
        let summary = tracker.load_json(ROUTE, Timestamp::parse(WALL).unwrap()).unwrap();
        assert_eq!(summary.year, 2025);
        AppState::new(tracker, TrackerConfig::default())
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn load_itinerary_reports_count() {
        let state = state();

        let (status, Json(body)) =
            load_itinerary(State(state.clone()), Bytes::from_static(ROUTE.as_bytes())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, LoadResponse { ok: true, count: 3, error: None });
        assert_eq!(all_locations(State(state)).await.0.len(), 3);
    }

    #[tokio::test]
    async fn load_rejects_missing_collection() {
        let state = loaded_state();

        let (status, Json(body)) =
            load_itinerary(State(state.clone()), Bytes::from_static(b"{\"stops\": []}")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!body.ok);
        assert!(body.error.unwrap().contains("destinations"));
        // Previous itinerary still served
        assert_eq!(all_locations(State(state)).await.0.len(), 3);
    }

    #[tokio::test]
    async fn load_rejects_non_utf8() {
        let (status, Json(body)) =
            load_itinerary(State(state()), Bytes::from_static(&[0xff, 0xfe])).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!body.ok);
    }

    #[tokio::test]
    async fn all_locations_in_source_order() {
        let state = loaded_state();

        let Json(views) = all_locations(State(state)).await;

        let ids: Vec<_> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["C", "A", "B"]);
        assert_eq!(views[1].payload["population"], serde_json::json!(42));
        assert_eq!(views[1].location, Some(LocationView { lat: 1.5, lng: 2.5 }));
    }

    #[tokio::test]
    async fn current_location_end_to_end() {
        let state = loaded_state();

        let query = millis("2025-01-01T06:00:00Z");
        let Json(found) = current_location(State(state.clone()), at(query.clone()))
            .await
            .unwrap();
        assert!(found.found);
        assert_eq!(found.query_time, query.parse().ok());
        assert_eq!(found.waypoint.unwrap().id, "A");
        assert_eq!(found.arrival_iso.as_deref(), Some("2025-01-01T00:00:00.000Z"));

        let Json(found) = current_location(State(state.clone()), at(millis("2025-01-01T18:00:00Z")))
            .await
            .unwrap();
        assert_eq!(found.waypoint.unwrap().id, "B");

        let Json(missing) = current_location(State(state), at(millis("2024-12-31T23:00:00Z")))
            .await
            .unwrap();
        assert!(!missing.found);
        assert!(missing.waypoint.is_none());
        assert!(missing.arrival_instant.is_none());
    }

    #[tokio::test]
    async fn current_location_rejects_bad_time() {
        let err = current_location(State(state()), at("whenever".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn visited_lists_reached_stops() {
        let state = loaded_state();

        let Json(visited) = visited_locations(State(state), at(millis("2025-01-01T12:00:00Z")))
            .await
            .unwrap();

        let ids: Vec<_> = visited.iter().map(|v| v.waypoint.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
        assert!(visited[0].arrival_instant < visited[1].arrival_instant);
    }

    #[tokio::test]
    async fn clock_override_drives_location() {
        let state = loaded_state();
        let start: i64 = millis("2025-01-01T11:58:00Z").parse().unwrap();

        let Json(clock) = set_clock(
            State(state.clone()),
            Json(ClockRequest {
                override_start: Some(start),
            }),
        )
        .await;
        assert!(clock.simulated);
        assert_eq!(clock.offset_minutes, None);

        let mut ids = Vec::new();
        for _ in 0..3 {
            // Wall clock argument is ignored while simulating
            let Json(found) = current_location(State(state.clone()), at("0".to_string()))
                .await
                .unwrap();
            ids.push(found.waypoint.unwrap().id);
        }
        assert_eq!(ids, ["A", "B", "B"]);

        let Json(clock) = get_clock(State(state.clone())).await;
        assert_eq!(clock.offset_minutes, Some(3));

        let Json(clock) = set_clock(State(state), Json(ClockRequest { override_start: None })).await;
        assert!(!clock.simulated);
        assert_eq!(clock.override_start, None);
    }

    #[tokio::test]
    async fn reload_reads_configured_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("route_santa_en.json");
        std::fs::write(&path, ROUTE).unwrap();

        let state = AppState::new(Tracker::default(), TrackerConfig::new(&path, None, 60));

        let (status, Json(body)) = reload_itinerary(State(state.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.count, 3);

        std::fs::remove_file(&path).unwrap();
        let (status, Json(body)) = reload_itinerary(State(state.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!body.ok);

        let Json(config) = get_config(State(state)).await;
        assert_eq!(config.location_count, 3);
        assert_eq!(config.update_interval_secs, 60);
        assert!(!config.simulated);
    }

    #[test]
    fn parse_time_defaults_to_now() {
        let before = Timestamp::now();
        let parsed = parse_time(None).unwrap();
        assert!(parsed >= before);
        assert!(parse_time(Some("")).is_ok());
        assert_eq!(
            parse_time(Some("1000")).unwrap(),
            Timestamp::from_millis(1000)
        );
    }

    #[test]
    fn app_error_status_codes() {
        let resp = AppError::BadRequest {
            message: "bad".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Internal {
            message: "broken".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
