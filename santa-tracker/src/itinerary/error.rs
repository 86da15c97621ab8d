//! Itinerary load errors.

use std::path::PathBuf;

use crate::domain::TimestampError;

/// Errors that leave the tracker with "no new itinerary".
///
/// None of these are fatal: the previously loaded itinerary stays in place.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The source file could not be read
    #[error("failed to read itinerary {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not JSON, or a record has the wrong shape
    #[error("malformed itinerary: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level collection is absent or not an array
    #[error("itinerary has no `{0}` collection")]
    MissingCollection(&'static str),

    /// A record's arrival or departure cannot be placed in the evaluation year
    #[error("destination {id}: invalid {field}: {source}")]
    InvalidInstant {
        id: String,
        field: &'static str,
        #[source]
        source: TimestampError,
    },

    /// The clock could not supply an evaluation year
    #[error("cannot determine evaluation year: {0}")]
    EvaluationYear(#[source] TimestampError),
}
