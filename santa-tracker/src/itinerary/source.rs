//! Reading the route document.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::error::DataError;
use super::types::RawItinerary;

/// Name of the top-level collection of stops.
pub const DESTINATIONS_KEY: &str = "destinations";

impl RawItinerary {
    /// Parse a route document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Interpret an already-parsed JSON document.
    ///
    /// A document without a `destinations` array is reported as
    /// [`DataError::MissingCollection`] rather than a generic shape error,
    /// so callers can tell "wrong file" from "broken record".
    pub fn from_value(value: Value) -> Result<Self, DataError> {
        match value.get(DESTINATIONS_KEY) {
            Some(Value::Array(_)) => Ok(serde_json::from_value(value)?),
            _ => Err(DataError::MissingCollection(DESTINATIONS_KEY)),
        }
    }
}

/// Read and parse a route document from disk.
pub fn read_file(path: &Path) -> Result<RawItinerary, DataError> {
    debug!(path = %path.display(), "loading itinerary");

    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    RawItinerary::from_json(&text)
}
