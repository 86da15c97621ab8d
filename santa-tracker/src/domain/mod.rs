//! Domain types for the Santa tracker.
//!
//! Timestamps and waypoints are validated when they are constructed, so the
//! lookup engine can work with them without re-checking ranges.

mod timestamp;
mod waypoint;

pub use timestamp::{Timestamp, TimestampError};
pub use waypoint::{Coordinates, Payload, Waypoint};
