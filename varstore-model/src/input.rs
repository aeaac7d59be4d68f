use serde::{Deserialize, Serialize};

/// Fields accepted when creating a variable.
///
/// Unknown keys in a JSON payload are ignored, so callers may pass a richer
/// object and only these three fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub value: String,
}

impl CreateInput {
    pub fn new(kind: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Partial update of a variable's editable fields.
///
/// `None` leaves the field untouched; `Some("")` sets it to the empty
/// string. Also used for restore overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl UpdatePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.value.is_none()
    }
}
