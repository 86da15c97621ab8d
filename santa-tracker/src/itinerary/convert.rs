//! Conversion from raw route records to normalized waypoints.
//!
//! Source files are recorded in some past year. Each arrival and departure
//! keeps its month, day and time of day but takes the evaluation year, so
//! last year's route replays on this year's Christmas Eve.

use crate::domain::{Coordinates, Timestamp, Waypoint};

use super::error::DataError;
use super::types::{RawDestination, RawItinerary};

/// Normalize every stop of a route into `year`.
///
/// All-or-nothing: the first record that cannot be normalized fails the
/// whole conversion.
pub fn normalize_itinerary(raw: RawItinerary, year: i32) -> Result<Vec<Waypoint>, DataError> {
    raw.destinations
        .into_iter()
        .map(|dest| normalize_destination(dest, year))
        .collect()
}

/// Normalize a single stop into `year`.
pub fn normalize_destination(raw: RawDestination, year: i32) -> Result<Waypoint, DataError> {
    let arrival = normalize_instant(&raw.id, "arrival", raw.arrival, year)?;
    let departure = normalize_instant(&raw.id, "departure", raw.departure, year)?;

    Ok(Waypoint {
        id: raw.id,
        city: raw.city,
        region: raw.region,
        location: raw.location.map(|l| Coordinates {
            lat: l.lat,
            lng: l.lng,
        }),
        arrival,
        departure,
        payload: raw.extra,
    })
}

fn normalize_instant(
    id: &str,
    field: &'static str,
    millis: i64,
    year: i32,
) -> Result<Timestamp, DataError> {
    Timestamp::from_millis(millis)
        .with_year(year)
        .map_err(|source| DataError::InvalidInstant {
            id: id.to_string(),
            field,
            source,
        })
}
