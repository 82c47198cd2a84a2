//! # Timestamp Value Object
//!
//! DateTime wrapper with the calendar helpers the exchange lifecycle needs
//! (validity windows in days, expiration checks, reference-code dates).
//!
//! # Examples
//!
//! ```
//! use echange_core::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.add_days(30);
//!
//! assert!(later.is_after(&now));
//! assert_eq!(now.days_until(&later), 30);
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>` and serializes transparently as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Date format used in reference codes: `YYYYMMDD`.
    pub const DATE_CODE_FORMAT: &'static str = "%Y%m%d";

    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use echange_core::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(1704067200).unwrap();
    /// assert_eq!(ts.timestamp_secs(), 1704067200);
    /// ```
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Adds seconds (negative values move backwards).
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Subtracts seconds.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Adds whole days (negative values move backwards).
    ///
    /// # Examples
    ///
    /// ```
    /// use echange_core::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(0).unwrap();
    /// assert_eq!(ts.add_days(1).timestamp_secs(), 86_400);
    /// ```
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Subtracts whole days.
    #[must_use]
    pub fn sub_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Returns true if this timestamp is in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0 < Utc::now()
    }

    /// Returns true if this timestamp is strictly before `other`.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this timestamp is strictly after `other`.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Whole days from `self` until `other`, negative when `other` is earlier.
    #[must_use]
    pub fn days_until(&self, other: &Self) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Formats the calendar date as `YYYYMMDD`.
    #[must_use]
    pub fn to_date_code(&self) -> String {
        self.0.format(Self::DATE_CODE_FORMAT).to_string()
    }

    /// Formats the timestamp as ISO 8601.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Returns the underlying DateTime.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn now_is_between_two_clock_reads() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.0 >= before);
        assert!(ts.0 <= after);
    }

    #[test]
    fn day_arithmetic() {
        let ts = Timestamp::from_secs(1_704_067_200).unwrap();
        assert_eq!(ts.add_days(2).timestamp_secs(), 1_704_067_200 + 2 * 86_400);
        assert_eq!(ts.sub_days(1).timestamp_secs(), 1_704_067_200 - 86_400);
        assert_eq!(ts.days_until(&ts.add_days(10)), 10);
        assert_eq!(ts.add_days(10).days_until(&ts), -10);
    }

    #[test]
    fn expiration() {
        assert!(Timestamp::from_secs(0).unwrap().is_expired());
        assert!(!Timestamp::now().add_days(1).is_expired());
    }

    #[test]
    fn date_code() {
        let ts = Timestamp::from_secs(1_704_067_200).unwrap();
        assert_eq!(ts.to_date_code(), "20240101");
        assert!(ts.to_iso8601().contains("2024-01-01"));
    }

    #[test]
    fn ordering_helpers() {
        let a = Timestamp::from_secs(10).unwrap();
        let b = Timestamp::from_secs(20).unwrap();
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));
        assert!(!a.is_after(&a));
    }

    #[test]
    fn serde_is_transparent() {
        let ts = Timestamp::from_secs(1_704_067_200).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.starts_with("\"2024-01-01"));
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}
