//! Record watermark.
//!
//! A counter bumped on every successful write. Callers compare the watermark
//! they last observed with the one returned by a later call to detect that
//! the record changed underneath them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version stamp of a persisted record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Watermark(u64);

impl Watermark {
    /// Watermark of a record that has never been written.
    pub const ZERO: Self = Self(0);

    /// Largest representable watermark. The next one after it is `1`.
    pub const MAX: Self = Self(u64::MAX);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns the watermark to store with the next write.
    ///
    /// At the maximum the counter resets to zero and is then incremented, so
    /// a freshly written record never carries `0`.
    #[must_use]
    pub const fn next(&self) -> Self {
        self.next_wrapping_at(u64::MAX)
    }

    /// Like [`next`](Self::next) with a lower ceiling. Any watermark at or
    /// above `max` is followed by `1`, which keeps the counter inside the
    /// integer range of hosts narrower than `u64`.
    #[must_use]
    pub const fn next_wrapping_at(&self, max: u64) -> Self {
        if self.0 >= max {
            Self(1)
        } else {
            Self(self.0 + 1)
        }
    }

    /// Returns true if a record at this watermark differs from one a caller
    /// observed at `observed`.
    #[must_use]
    pub fn has_changed_since(&self, observed: Watermark) -> bool {
        self.0 != observed.0
    }
}

impl From<u64> for Watermark {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
