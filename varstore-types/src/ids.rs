//! Identifier type for variable entries.
//!
//! Ids are a fixed human-readable prefix followed by a random hex suffix,
//! e.g. `e-gv-3f9a2c1`. Generation takes a predicate over the ids already in
//! use, so a returned id never collides with an existing key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// Hex digits used for the short suffix.
const SHORT_SUFFIX_LEN: usize = 7;

/// Short-suffix draws before switching to a full 32-digit suffix.
const MAX_SHORT_ATTEMPTS: usize = 16;

/// Unique identifier for a variable entry within a record.
///
/// Ordered so records serialize their entry map deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(String);

impl VariableId {
    /// Generates a fresh id with the given prefix.
    ///
    /// `is_taken` is consulted for every candidate; candidates it reports as
    /// taken are discarded and redrawn. Deleted entries must be reported as
    /// taken too, since ids are never reused.
    pub fn generate<F>(prefix: &str, mut is_taken: F) -> Self
    where
        F: FnMut(&VariableId) -> bool,
    {
        for _ in 0..MAX_SHORT_ATTEMPTS {
            let suffix = Uuid::new_v4().simple().to_string();
            let candidate = Self(format!("{prefix}{}", &suffix[..SHORT_SUFFIX_LEN]));
            if !is_taken(&candidate) {
                return candidate;
            }
        }

        loop {
            let candidate = Self(format!("{prefix}{}", Uuid::new_v4().simple()));
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }

    /// Parses an id supplied by a caller.
    ///
    /// Rejects empty strings and anything containing whitespace or control
    /// characters; the prefix is not enforced so ids minted by other hosts
    /// stay addressable.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::InvalidId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id starts with `prefix`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VariableId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for VariableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
