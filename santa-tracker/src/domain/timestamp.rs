//! Millisecond timestamps.
//!
//! Every instant crossing the library boundary is an integer number of
//! milliseconds since the UNIX epoch. Calendar work (year substitution, ISO
//! rendering) goes through chrono in UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Timelike, Utc};
use std::fmt;

/// Error returned when a timestamp cannot be interpreted as a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// The millisecond value lies outside chrono's representable range
    #[error("timestamp {0} ms is out of range")]
    OutOfRange(i64),

    /// The target year cannot hold the source month/day
    #[error("cannot move timestamp into year {0}")]
    InvalidYear(i32),

    /// Neither an epoch-milliseconds integer nor an RFC 3339 string
    #[error("cannot parse timestamp: {0}")]
    Unparseable(String),
}

/// An instant in milliseconds since the UNIX epoch (UTC).
///
/// # Examples
///
/// ```
/// use santa_tracker::domain::Timestamp;
///
/// let ts = Timestamp::parse("2025-12-24T06:00:00Z").unwrap();
/// assert_eq!(ts.to_string(), "2025-12-24T06:00:00.000Z");
/// assert_eq!(Timestamp::parse(&ts.as_millis().to_string()), Ok(ts));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wrap a raw millisecond value.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the raw millisecond value.
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Convert from a chrono UTC datetime, truncating to milliseconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Parse either an epoch-milliseconds integer or an RFC 3339 string.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        let s = s.trim();
        if let Ok(millis) = s.parse::<i64>() {
            return Ok(Self(millis));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|_| TimestampError::Unparseable(s.to_string()))
    }

    /// Converts to a chrono UTC datetime.
    pub fn to_datetime(self) -> Result<DateTime<Utc>, TimestampError> {
        DateTime::from_timestamp_millis(self.0).ok_or(TimestampError::OutOfRange(self.0))
    }

    /// The UTC calendar year this instant falls in.
    pub fn year(self) -> Result<i32, TimestampError> {
        self.to_datetime().map(|dt| dt.year())
    }

    /// Add a duration, saturating at the ends of the millisecond range.
    pub fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.num_milliseconds()))
    }

    /// Replace the calendar year, keeping month, day, hour, minute and second.
    ///
    /// This is field substitution, not a shift by elapsed time: two instants
    /// that differ only in their year map to the same result. Sub-second
    /// precision is dropped, and 29 February rolls over to 1 March when the
    /// target year has no leap day.
    ///
    /// ```
    /// use santa_tracker::domain::Timestamp;
    ///
    /// let source = Timestamp::parse("2020-12-24T06:00:00Z").unwrap();
    /// let normalized = source.with_year(2025).unwrap();
    /// assert_eq!(normalized, Timestamp::parse("2025-12-24T06:00:00Z").unwrap());
    /// ```
    pub fn with_year(self, year: i32) -> Result<Self, TimestampError> {
        let source = self.to_datetime()?;

        let date = NaiveDate::from_ymd_opt(year, source.month(), source.day())
            .or_else(|| {
                if source.month() == 2 && source.day() == 29 {
                    NaiveDate::from_ymd_opt(year, 3, 1)
                } else {
                    None
                }
            })
            .ok_or(TimestampError::InvalidYear(year))?;

        let naive = date
            .and_hms_opt(source.hour(), source.minute(), source.second())
            .ok_or(TimestampError::InvalidYear(year))?;

        Ok(Self::from_datetime(naive.and_utc()))
    }

    /// ISO 8601 rendering with millisecond precision, e.g.
    /// `2025-12-24T06:00:00.000Z`.
    pub fn to_iso8601(self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({} = {})", self.0, self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Ok(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Err(_) => write!(f, "{}ms", self.0),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}
