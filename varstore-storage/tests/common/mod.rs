//! Shared test helpers for storage tests.

#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use varstore_model::CreateInput;
use varstore_storage::{DEFAULT_META_KEY, MemoryMetaStore, StoreConfig, VariableStore};
use varstore_types::VariableId;

pub const KEY: &str = DEFAULT_META_KEY;
pub const COLOR: &str = "global-color-variable";

/// Installs a test subscriber once; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh in-memory store plus a handle to its backing map.
pub fn memory_store() -> (MemoryMetaStore, VariableStore<MemoryMetaStore>) {
    memory_store_with(StoreConfig::default())
}

pub fn memory_store_with(config: StoreConfig) -> (MemoryMetaStore, VariableStore<MemoryMetaStore>) {
    init_tracing();
    let meta = MemoryMetaStore::new();
    let store = VariableStore::new(meta.clone(), config);
    (meta, store)
}

pub fn color(label: &str) -> CreateInput {
    CreateInput::new(COLOR, label, "#000000")
}

pub fn id(s: &str) -> VariableId {
    VariableId::parse(s).unwrap()
}

/// Stores an empty record carrying the given watermark.
pub fn seed_watermark(meta: &MemoryMetaStore, watermark: u64) {
    meta.put(
        KEY,
        format!(r#"{{"data":{{}},"watermark":{watermark},"version":1}}"#),
    );
}
