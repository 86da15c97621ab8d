//! Query-time source: real time or a simulated Christmas Eve.
//!
//! In real-time mode the caller's wall-clock instant is used as-is. With an
//! override start configured, every query advances a virtual clock by one
//! minute from that start and ignores the wall clock entirely, which lets a
//! whole night's route be replayed at poll speed.

use chrono::Duration;
use tracing::debug;

use crate::domain::{Timestamp, TimestampError};

/// Clock configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockConfig {
    /// Start of the simulated timeline; `None` means real time.
    pub override_start: Option<Timestamp>,
}

impl ClockConfig {
    /// Real-time configuration.
    pub fn real_time() -> Self {
        Self::default()
    }

    /// Simulation starting at `start`.
    pub fn simulated(start: Timestamp) -> Self {
        Self {
            override_start: Some(start),
        }
    }
}

/// Anchored virtual timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VirtualClock {
    start: Timestamp,
    /// Minutes elapsed since `start`.
    offset: i64,
}

impl VirtualClock {
    fn tick(&mut self) -> Timestamp {
        self.offset += 1;
        self.start.saturating_add(Duration::minutes(self.offset))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    RealTime,
    Simulated {
        start: Timestamp,
        /// Created on the first query after simulation is enabled.
        state: Option<VirtualClock>,
    },
}

/// Supplies the instant each query is evaluated at.
#[derive(Debug, Clone)]
pub struct ClockSource {
    mode: Mode,
}

impl ClockSource {
    /// Create a clock from configuration.
    pub fn new(config: ClockConfig) -> Self {
        let mode = match config.override_start {
            None => Mode::RealTime,
            Some(start) => Mode::Simulated { start, state: None },
        };
        Self { mode }
    }

    /// Apply a new configuration.
    ///
    /// Disabling simulation drops the virtual clock, so enabling it again
    /// restarts from the new start with a zero offset. Re-supplying the
    /// current start keeps the progression going.
    pub fn configure(&mut self, config: ClockConfig) {
        match (config.override_start, &self.mode) {
            (None, Mode::RealTime) => {}
            (None, Mode::Simulated { .. }) => {
                debug!("override time removed, back to real time");
                self.mode = Mode::RealTime;
            }
            (Some(start), Mode::Simulated { start: current, .. }) if *current == start => {}
            (Some(start), _) => {
                debug!(%start, "override time set");
                self.mode = Mode::Simulated { start, state: None };
            }
        }
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> ClockConfig {
        match self.mode {
            Mode::RealTime => ClockConfig::real_time(),
            Mode::Simulated { start, .. } => ClockConfig::simulated(start),
        }
    }

    /// Check if simulation mode is active.
    pub fn is_simulated(&self) -> bool {
        matches!(self.mode, Mode::Simulated { .. })
    }

    /// Minutes the virtual clock has advanced, if it has been anchored.
    pub fn offset_minutes(&self) -> Option<i64> {
        match self.mode {
            Mode::Simulated {
                state: Some(clock), ..
            } => Some(clock.offset),
            _ => None,
        }
    }

    /// Instant the next query should be evaluated at.
    ///
    /// In simulation mode each call advances the virtual clock by one minute,
    /// so the first call returns `start + 1min`.
    pub fn query_time(&mut self, wall: Timestamp) -> Timestamp {
        match &mut self.mode {
            Mode::RealTime => wall,
            Mode::Simulated { start, state } => {
                let clock = state.get_or_insert_with(|| {
                    debug!(start = %start, "starting override time progression");
                    VirtualClock {
                        start: *start,
                        offset: 0,
                    }
                });
                let now = clock.tick();
                debug!(%now, offset = clock.offset, "override time progressed");
                now
            }
        }
    }

    /// Calendar year that itinerary timestamps are normalized into.
    ///
    /// Always the UTC year of the wall clock, whatever the mode. A simulated
    /// night replays against the itinerary as loaded, and switching modes
    /// never leaves the stops in a year that is no longer current.
    pub fn evaluation_year(&self, wall: Timestamp) -> Result<i32, TimestampError> {
        wall.year()
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}
