//! Error types for the variable store.

use std::fmt;
use thiserror::Error;
use varstore_types::VariableId;

/// Result type for variable store operations.
pub type VariableResult<T> = Result<T, VariableError>;

/// The mutation an error or log line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Restore,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
        })
    }
}

/// Errors that can occur in variable store operations.
///
/// Validation errors are raised before any write is attempted, so the stored
/// record is untouched whenever one of them is returned.
#[derive(Debug, Error)]
pub enum VariableError {
    /// No entry with this id exists, live or deleted.
    #[error("variable not found: {0}")]
    RecordNotFound(VariableId),

    /// Another live entry already uses this label (case-insensitive).
    #[error("variable label already exists: {0:?}")]
    DuplicatedLabel(String),

    /// The mutation would leave more live entries than allowed.
    #[error("total variables count limit reached (max {0})")]
    VariablesLimitReached(usize),

    /// The host store refused the write.
    #[error("failed to {0} variable")]
    Fatal(Operation),

    /// Compare-and-set write lost against a concurrent writer.
    #[error("failed to {0} variable: record changed since it was read")]
    Conflict(Operation),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A blob exists under the key but is not a variable record. Mutations
    /// refuse to run so the blob is never overwritten.
    #[error("failed to {operation} variable: stored record is unreadable ({reason})")]
    UnreadableRecord { operation: Operation, reason: String },

    /// Host store could not be opened or prepared.
    #[error("storage error: {0}")]
    Storage(String),
}

impl VariableError {
    /// Stable machine-readable code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::RecordNotFound(_) => "variable_not_found",
            Self::DuplicatedLabel(_) => "duplicated_label",
            Self::VariablesLimitReached(_) => "variables_limit_reached",
            Self::Fatal(_) => "unexpected_server_error",
            Self::Conflict(_) => "record_conflict",
            Self::Serialization(_) => "serialization_error",
            Self::UnreadableRecord { .. } => "unreadable_record",
            Self::Storage(_) => "storage_error",
        }
    }

    /// True for errors the caller can fix by changing the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound(_)
                | Self::DuplicatedLabel(_)
                | Self::VariablesLimitReached(_)
                | Self::Conflict(_)
        )
    }

    /// Input field the error should be attached to in an editor form.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::DuplicatedLabel(_) => Some("label"),
            _ => None,
        }
    }
}
