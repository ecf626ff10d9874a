//! Timestamp value object.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A UTC instant at which a ledger event or transition happened.
///
/// Services take the current time once per operation and pass it down, so
/// every record touched by one commit shares the same timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp representing the current moment in UTC.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix epoch seconds.
    ///
    /// Returns `None` if the seconds are out of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use consultant_wallet::domain::value_objects::Timestamp;
    ///
    /// let ts = Timestamp::from_unix_seconds(1_705_312_200);
    /// assert!(ts.is_some());
    /// ```
    #[must_use]
    pub fn from_unix_seconds(seconds: i64) -> Option<Self> {
        Utc.timestamp_opt(seconds, 0).single().map(Self)
    }

    /// Parses an RFC 3339 timestamp such as `2024-01-15T10:30:00Z`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|datetime| Self(datetime.with_timezone(&Utc)))
    }

    /// Returns the underlying `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the ISO 8601 representation.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.to_iso_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}
