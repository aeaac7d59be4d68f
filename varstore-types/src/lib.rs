//! Core type definitions for the variable store.
//!
//! This crate defines the small value types every other crate leans on:
//! - Variable identifiers (prefixed, collision-checked at generation)
//! - The record watermark with its wraparound rule
//! - Second-precision UTC deletion stamps
//!
//! The persisted schema itself (entries, record, typed inputs) lives in
//! `varstore-model`.

mod ids;
mod timestamp;
mod watermark;

pub use ids::VariableId;
pub use timestamp::{DELETED_AT_FORMAT, DeletedAt};
pub use watermark::Watermark;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when parsing value types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid variable id: {0:?}")]
    InvalidId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
