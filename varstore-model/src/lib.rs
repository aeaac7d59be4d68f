//! Persisted schema for the variable store.
//!
//! Defines the types that make up the single blob kept under the store key:
//! - [`VariableRecord`]: the whole blob (entries, watermark, schema version)
//! - [`VariableEntry`]: one named, typed variable with its [`EntryState`]
//! - [`Variable`]: an entry paired with its id, as returned to callers
//! - [`CreateInput`] / [`UpdatePatch`]: typed inputs for mutations
//!
//! The JSON layout is shared with other hosts of the same record, so field
//! names on the wire (`data`, `version`, `type`, `deleted_at`) differ from the
//! Rust field names in a few places.

mod entry;
mod input;
mod record;

pub use entry::{EntryState, Variable, VariableEntry};
pub use input::{CreateInput, UpdatePatch};
pub use record::{SCHEMA_VERSION, VariableRecord};
