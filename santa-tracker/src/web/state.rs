//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::tracker::{Tracker, TrackerConfig};

/// Shared application state.
///
/// Loads, resolves and clock changes take the write lock (a resolve may
/// advance the simulated clock); listing stops only reads.
#[derive(Clone)]
pub struct AppState {
    /// The lookup engine
    pub tracker: Arc<RwLock<Tracker>>,

    /// Startup configuration
    pub config: Arc<TrackerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(tracker: Tracker, config: TrackerConfig) -> Self {
        Self {
            tracker: Arc::new(RwLock::new(tracker)),
            config: Arc::new(config),
        }
    }
}
