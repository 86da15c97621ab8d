//! Itinerary loading, year normalization and the arrivals index.
//!
//! A load reads the raw route document, moves every arrival and departure
//! into the evaluation year, and builds a fresh [`Itinerary`] snapshot
//! (waypoints plus a sorted [`ArrivalsIndex`]). The store swaps the whole
//! snapshot in with one assignment, so readers never see a half-built index.

mod arrivals_index;
mod convert;
mod error;
mod source;
mod store;
mod types;

pub use arrivals_index::{ArrivalsIndex, Search};
pub use convert::{normalize_destination, normalize_itinerary};
pub use error::DataError;
pub use source::{DESTINATIONS_KEY, read_file};
pub use store::{IntegrityFault, Itinerary, ItineraryStore, Visited};
pub use types::{RawDestination, RawItinerary, RawLocation};
