//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::error::VariableResult;

/// Key the record blob is stored under by default.
pub const DEFAULT_META_KEY: &str = "_global_variables";

/// Prefix of generated variable ids.
pub const DEFAULT_ID_PREFIX: &str = "e-gv-";

/// Live entries allowed per record.
pub const DEFAULT_MAX_LIVE_ENTRIES: usize = 100;

/// Highest watermark written before wrapping back to 1.
pub const DEFAULT_MAX_WATERMARK: u64 = u64::MAX;

/// Wrap bound for hosts that keep the watermark in a signed 64-bit integer.
pub const SIGNED_MAX_WATERMARK: u64 = i64::MAX as u64;

/// How a mutation commits its write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Plain overwrite. Two writers racing on the same record both succeed
    /// and the later one wins; the watermark is the only staleness signal.
    #[default]
    LastWriterWins,
    /// Write only if the stored blob is still the one the operation read.
    CompareAndSet,
}

/// Configuration for a [`VariableStore`](crate::VariableStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key of the metadata slot holding the record.
    pub meta_key: String,
    /// Prefix for generated ids.
    pub id_prefix: String,
    /// Maximum number of live (non-deleted) entries.
    pub max_live_entries: usize,
    pub write_mode: WriteMode,
    /// Watermark value after which the next write wraps to 1. Set to
    /// [`SIGNED_MAX_WATERMARK`] when the record is shared with a host that
    /// cannot read integers above `i64::MAX`.
    pub max_watermark: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            meta_key: DEFAULT_META_KEY.to_string(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            max_live_entries: DEFAULT_MAX_LIVE_ENTRIES,
            write_mode: WriteMode::LastWriterWins,
            max_watermark: DEFAULT_MAX_WATERMARK,
        }
    }
}

impl StoreConfig {
    /// Parses a JSON config; missing keys keep their defaults.
    pub fn from_json(json: &str) -> VariableResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_meta_key(mut self, key: impl Into<String>) -> Self {
        self.meta_key = key.into();
        self
    }

    #[must_use]
    pub fn with_max_live_entries(mut self, max: usize) -> Self {
        self.max_live_entries = max;
        self
    }

    #[must_use]
    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_watermark(mut self, max: u64) -> Self {
        self.max_watermark = max;
        self
    }
}
