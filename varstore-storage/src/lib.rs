//! Variable storage over a host key-value metadata store.
//!
//! Manages a bounded set of named, typed variables persisted as one JSON
//! blob under a single key of a host metadata store.
//!
//! # Architecture
//!
//! - [`MetaStore`] is the host boundary: read a blob, write a blob
//! - [`VariableStore`] runs the load/validate/write cycle for `create`,
//!   `update`, `delete` and `restore`
//! - Every successful write bumps the record [`Watermark`](varstore_types::Watermark)
//! - Deletion is soft; deleted entries keep their id forever
//! - Live entries are capped and their labels are unique case-insensitively
//!
//! [`MemoryMetaStore`] and [`SqliteMetaStore`] are bundled host stores.

mod config;
mod error;
mod meta_store;
mod sqlite_store;
mod validate;
mod variable_store;

pub use config::{
    DEFAULT_ID_PREFIX, DEFAULT_MAX_LIVE_ENTRIES, DEFAULT_MAX_WATERMARK, DEFAULT_META_KEY,
    SIGNED_MAX_WATERMARK, StoreConfig, WriteMode,
};
pub use error::{Operation, VariableError, VariableResult};
pub use meta_store::{CasOutcome, MemoryMetaStore, MetaStore};
pub use sqlite_store::SqliteMetaStore;
pub use variable_store::{Mutation, VariableStore};
