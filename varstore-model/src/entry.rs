use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use varstore_types::{DeletedAt, VariableId};

use crate::UpdatePatch;

/// Whether an entry is live or sitting in the trash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryState {
    #[default]
    Live,
    Deleted { at: DeletedAt },
}

impl EntryState {
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    #[must_use]
    pub fn deleted_at(&self) -> Option<DeletedAt> {
        match self {
            Self::Live => None,
            Self::Deleted { at } => Some(*at),
        }
    }
}

/// A single variable as stored in the record.
///
/// `kind` is fixed at creation. `label` and `value` are editable whether the
/// entry is live or deleted; editing a deleted entry does not restore it.
///
/// `label` is `None` only for stored entries written without one. Such
/// entries never take part in the duplicate-label check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersistedEntry", into = "PersistedEntry")]
pub struct VariableEntry {
    pub kind: String,
    pub label: Option<String>,
    pub value: String,
    pub state: EntryState,
}

impl VariableEntry {
    /// Creates a live entry.
    pub fn new(kind: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: Some(label.into()),
            value: value.into(),
            state: EntryState::Live,
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    #[must_use]
    pub fn deleted_at(&self) -> Option<DeletedAt> {
        self.state.deleted_at()
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Case-insensitive label comparison. An entry without a label matches
    /// nothing.
    #[must_use]
    pub fn label_matches(&self, label: &str) -> bool {
        self.label
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == label.to_lowercase())
    }

    /// Overwrites the fields present in `patch`. `kind` and state are kept.
    pub fn apply(&mut self, patch: &UpdatePatch) {
        if let Some(label) = &patch.label {
            self.label = Some(label.clone());
        }
        if let Some(value) = &patch.value {
            self.value.clone_from(value);
        }
    }

    /// Flags the entry deleted at `at`. Re-deleting replaces the stamp.
    pub fn mark_deleted(&mut self, at: DeletedAt) {
        self.state = EntryState::Deleted { at };
    }

    /// Rebuilds a live entry from the type, label and value only.
    #[must_use]
    pub fn restored(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            label: self.label.clone(),
            value: self.value.clone(),
            state: EntryState::Live,
        }
    }
}

/// An entry together with its id, as handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    #[serde(flatten)]
    pub entry: VariableEntry,
}

impl Variable {
    pub fn new(id: VariableId, entry: VariableEntry) -> Self {
        Self { id, entry }
    }
}

/// Wire shape of an entry.
///
/// Other hosts write this layout with loose typing, so scalar fields accept
/// any JSON scalar and `deleted` follows the usual truthiness rules. A
/// foreign field never costs the rest of the record.
#[derive(Serialize, Deserialize)]
struct PersistedEntry {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    kind: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    label: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    value: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        deserialize_with = "lenient_flag"
    )]
    deleted: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_deleted_at"
    )]
    deleted_at: Option<DeletedAt>,
}

/// Strings pass through, other scalars are rendered as text, `null` is absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// `0`, `""`, `"0"`, `false`, `null` and empty containers are false.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !(s.is_empty() || s == "0"),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    })
}

/// Unparsable stamps are dropped instead of failing the whole record.
fn lenient_deleted_at<'de, D>(deserializer: D) -> Result<Option<DeletedAt>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DeletedAt::parse(s).ok()))
}

impl From<PersistedEntry> for VariableEntry {
    fn from(p: PersistedEntry) -> Self {
        let state = if p.deleted {
            EntryState::Deleted {
                at: p.deleted_at.unwrap_or_default(),
            }
        } else {
            EntryState::Live
        };
        Self {
            kind: p.kind.unwrap_or_default(),
            label: p.label,
            value: p.value.unwrap_or_default(),
            state,
        }
    }
}

impl From<VariableEntry> for PersistedEntry {
    fn from(e: VariableEntry) -> Self {
        let deleted_at = e.state.deleted_at();
        Self {
            kind: Some(e.kind),
            label: e.label,
            value: Some(e.value),
            deleted: deleted_at.is_some(),
            deleted_at,
        }
    }
}
