use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use varstore_types::{VariableId, Watermark};

use crate::VariableEntry;

/// Layout version written into every record.
pub const SCHEMA_VERSION: u32 = 1;

/// The whole persisted blob.
///
/// Entries are never removed; deletion is a state change on the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRecord {
    #[serde(rename = "data", default, deserialize_with = "entries_or_empty_list")]
    pub entries: BTreeMap<VariableId, VariableEntry>,
    #[serde(default)]
    pub watermark: Watermark,
    #[serde(rename = "version", default = "default_schema_version")]
    pub schema_version: u32,
}

impl Default for VariableRecord {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            watermark: Watermark::ZERO,
            schema_version: SCHEMA_VERSION,
        }
    }
}

impl VariableRecord {
    /// Decodes a stored blob.
    ///
    /// Returns `Ok(None)` when the blob holds no record at all (empty input,
    /// `null`, a scalar, an empty array or an empty object). Entry fields are
    /// read leniently, so only a structurally foreign object is an error: an
    /// entry that is not an object, or a watermark that is not an integer.
    pub fn decode(blob: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        if blob.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: serde_json::Value = serde_json::from_slice(blob)?;
        match value {
            serde_json::Value::Object(map) if !map.is_empty() => {
                serde_json::from_value(serde_json::Value::Object(map)).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Encodes the record for storage.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    #[must_use]
    pub fn get(&self, id: &VariableId) -> Option<&VariableEntry> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &VariableId) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterates over entries that are not deleted.
    pub fn live(&self) -> impl Iterator<Item = (&VariableId, &VariableEntry)> {
        self.entries.iter().filter(|(_, entry)| entry.is_live())
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Finds a live entry whose label equals `label` case-insensitively,
    /// ignoring the entry with id `except`. Entries without a label are
    /// skipped.
    #[must_use]
    pub fn find_live_label(&self, label: &str, except: Option<&VariableId>) -> Option<&VariableId> {
        self.live()
            .filter(|(id, _)| Some(*id) != except)
            .find(|(_, entry)| entry.label_matches(label))
            .map(|(id, _)| id)
    }
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Some hosts serialize an empty map as `[]`.
fn entries_or_empty_list<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<VariableId, VariableEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entries {
        Map(BTreeMap<VariableId, VariableEntry>),
        List(Vec<serde_json::Value>),
    }

    match Entries::deserialize(deserializer)? {
        Entries::Map(map) => Ok(map),
        Entries::List(list) if list.is_empty() => Ok(BTreeMap::new()),
        Entries::List(_) => Err(serde::de::Error::custom(
            "entries must be an object keyed by id",
        )),
    }
}
