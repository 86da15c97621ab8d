//! Tracker configuration.

use std::path::PathBuf;

use chrono::Duration;

use crate::domain::{Timestamp, TimestampError};

use super::clock::ClockConfig;

/// Default route document name.
pub const DEFAULT_DATA_FILE: &str = "route_santa_en.json";

/// Error reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `SANTA_OVERRIDE_TIME` is neither epoch milliseconds nor RFC 3339
    #[error("invalid SANTA_OVERRIDE_TIME: {0}")]
    InvalidOverride(#[source] TimestampError),

    /// `SANTA_UPDATE_INTERVAL_SECS` is not a positive integer
    #[error("invalid SANTA_UPDATE_INTERVAL_SECS: {0:?}")]
    InvalidInterval(String),
}

/// Configuration for the tracker and its front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Route document loaded at startup and on reload.
    pub data_file: PathBuf,

    /// Start of the simulated timeline, if any.
    pub override_start: Option<Timestamp>,

    /// How often pollers should ask for Santa's location (seconds).
    pub update_interval_secs: u64,
}

impl TrackerConfig {
    /// Create a configuration with the given parameters.
    pub fn new(
        data_file: impl Into<PathBuf>,
        override_start: Option<Timestamp>,
        update_interval_secs: u64,
    ) -> Self {
        Self {
            data_file: data_file.into(),
            override_start,
            update_interval_secs,
        }
    }

    /// Read configuration through `var`, falling back to defaults.
    ///
    /// Recognized variables: `SANTA_DATA_FILE`, `SANTA_OVERRIDE_TIME`
    /// (epoch milliseconds or RFC 3339; empty means real time) and
    /// `SANTA_UPDATE_INTERVAL_SECS`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = var("SANTA_DATA_FILE").filter(|p| !p.is_empty()) {
            config.data_file = PathBuf::from(path);
        }

        if let Some(raw) = var("SANTA_OVERRIDE_TIME").filter(|t| !t.trim().is_empty()) {
            let start = Timestamp::parse(&raw).map_err(ConfigError::InvalidOverride)?;
            config.override_start = Some(start);
        }

        if let Some(raw) = var("SANTA_UPDATE_INTERVAL_SECS") {
            config.update_interval_secs = raw
                .trim()
                .parse()
                .ok()
                .filter(|&secs: &u64| secs > 0)
                .ok_or(ConfigError::InvalidInterval(raw))?;
        }

        Ok(config)
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Clock settings derived from this configuration.
    pub fn clock(&self) -> ClockConfig {
        ClockConfig {
            override_start: self.override_start,
        }
    }

    /// Returns the poll interval as a Duration.
    pub fn update_interval(&self) -> Duration {
        Duration::seconds(self.update_interval_secs as i64)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            override_start: None,
            update_interval_secs: 60, // once a minute
        }
    }
}
