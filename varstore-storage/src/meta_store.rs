//! Host key-value metadata store abstraction.
//!
//! The variable store only ever touches one key. Hosts implement
//! [`MetaStore`] over whatever persistence they have; the boundary is
//! deliberately lossy (absence on read, a flag on write) so that load never
//! fails and write failures surface as a single fatal outcome.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result of a compare-and-set write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    Written,
    /// The stored blob no longer matched the expected one.
    Conflict,
    Failed,
}

/// Abstract metadata store interface.
pub trait MetaStore: Send + Sync {
    /// Returns the raw blob stored under `key`, if any.
    fn read(&self, key: &str) -> Option<Vec<u8>>;

    /// Replaces the blob under `key`. Returns whether the write succeeded.
    fn write(&self, key: &str, blob: &[u8]) -> bool;

    /// Writes `blob` only if the current value equals `expected`
    /// (`None` meaning the key is absent).
    ///
    /// The default implementation is a read followed by a write and is not
    /// atomic; stores that can do better should override it.
    fn compare_and_write(&self, key: &str, expected: Option<&[u8]>, blob: &[u8]) -> CasOutcome {
        if self.read(key).as_deref() != expected {
            return CasOutcome::Conflict;
        }
        if self.write(key, blob) {
            CasOutcome::Written
        } else {
            CasOutcome::Failed
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<String, Vec<u8>>,
    fail_writes: bool,
    writes: u64,
}

/// In-process store backed by a shared map.
///
/// Clones share the same map, which lets two `VariableStore`s act as
/// independent callers against one record.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetaStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every subsequent write report failure until switched off.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Returns the stored blob without going through the trait.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().values.get(key).cloned()
    }

    /// Seeds a blob directly, bypassing failure injection and the counter.
    pub fn put(&self, key: &str, blob: impl Into<Vec<u8>>) {
        self.lock().values.insert(key.to_string(), blob.into());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.lock().writes
    }
}

impl MetaStore for MemoryMetaStore {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        self.raw(key)
    }

    fn write(&self, key: &str, blob: &[u8]) -> bool {
        let mut state = self.lock();
        if state.fail_writes {
            return false;
        }
        state.values.insert(key.to_string(), blob.to_vec());
        state.writes += 1;
        true
    }

    fn compare_and_write(&self, key: &str, expected: Option<&[u8]>, blob: &[u8]) -> CasOutcome {
        let mut state = self.lock();
        if state.values.get(key).map(Vec::as_slice) != expected {
            return CasOutcome::Conflict;
        }
        if state.fail_writes {
            return CasOutcome::Failed;
        }
        state.values.insert(key.to_string(), blob.to_vec());
        state.writes += 1;
        CasOutcome::Written
    }
}
