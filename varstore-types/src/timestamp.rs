//! UTC deletion stamps with second precision.
//!
//! Persisted as `YYYY-MM-DD HH:MM:SS` without a zone suffix; the value is
//! always UTC.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::Error;

/// `strftime` pattern used for the persisted form.
pub const DELETED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The moment an entry was soft-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeletedAt(NaiveDateTime);

impl DeletedAt {
    /// Stamps the current UTC time, truncated to whole seconds.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().naive_utc().trunc_subsecs(0))
    }

    /// Builds a stamp from seconds since the Unix epoch.
    pub fn from_unix_seconds(secs: i64) -> Result<Self, Error> {
        DateTime::from_timestamp(secs, 0)
            .map(|dt| Self(dt.naive_utc()))
            .ok_or_else(|| Error::InvalidTimestamp(format!("{secs} is out of range")))
    }

    /// Parses the persisted `YYYY-MM-DD HH:MM:SS` form.
    pub fn parse(s: &str) -> Result<Self, Error> {
        NaiveDateTime::parse_from_str(s.trim(), DELETED_AT_FORMAT)
            .map(|dt| Self(dt.trunc_subsecs(0)))
            .map_err(|e| Error::InvalidTimestamp(format!("{s:?}: {e}")))
    }

    /// Returns the stamp as a UTC datetime.
    #[must_use]
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.and_utc()
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub fn unix_seconds(&self) -> i64 {
        self.0.and_utc().timestamp()
    }
}

/// The Unix epoch; used for legacy entries flagged deleted without a stamp.
impl Default for DeletedAt {
    fn default() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH.naive_utc())
    }
}

impl fmt::Display for DeletedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DELETED_AT_FORMAT))
    }
}

impl Serialize for DeletedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeletedAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
