//! The variable store: load, validate, write back.
//!
//! Every mutation follows the same cycle:
//! 1. read the blob under the configured key (absence means an empty record,
//!    a blob that is not a record aborts the mutation)
//! 2. apply the change to an in-memory copy
//! 3. validate the prospective record
//! 4. bump the watermark and write the whole blob back
//!
//! Nothing is cached between calls. Without [`WriteMode::CompareAndSet`]
//! there is no protection against concurrent writers; the last write wins
//! and callers detect staleness through the returned watermark.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use varstore_model::{CreateInput, UpdatePatch, Variable, VariableEntry, VariableRecord};
use varstore_types::{DeletedAt, VariableId, Watermark};

use crate::config::{StoreConfig, WriteMode};
use crate::error::{Operation, VariableError, VariableResult};
use crate::meta_store::{CasOutcome, MetaStore};
use crate::validate::{ensure_label_available, ensure_within_limit};

/// Outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mutation {
    /// The entry as stored, with its id.
    pub variable: Variable,
    /// Watermark of the record after the write.
    pub watermark: Watermark,
}

/// A record as read, plus the exact bytes it came from. `record` is an error
/// when a blob exists but is not a variable record.
struct Loaded {
    raw: Option<Vec<u8>>,
    record: Result<VariableRecord, serde_json::Error>,
}

/// CRUD over the variable record kept in a [`MetaStore`].
pub struct VariableStore<S> {
    store: S,
    config: StoreConfig,
}

impl<S: MetaStore> VariableStore<S> {
    pub fn new(store: S, config: StoreConfig) -> Self {
        Self { store, config }
    }

    /// Creates a store with [`StoreConfig::default`].
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, StoreConfig::default())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn meta_store(&self) -> &S {
        &self.store
    }

    /// Loads the current record. Never fails; anything unreadable yields the
    /// default empty record.
    pub fn load(&self) -> VariableRecord {
        self.read().record.unwrap_or_default()
    }

    /// All entries, deleted ones included.
    pub fn list(&self) -> BTreeMap<VariableId, VariableEntry> {
        self.load().entries
    }

    /// Current watermark, for callers checking whether their view is stale.
    pub fn watermark(&self) -> Watermark {
        self.load().watermark
    }

    pub fn create(&self, input: CreateInput) -> VariableResult<Mutation> {
        let (raw, mut record) = self.read_for_write(Operation::Create)?;

        let id = VariableId::generate(&self.config.id_prefix, |candidate| {
            record.contains(candidate)
        });
        let entry = VariableEntry::new(input.kind, input.label, input.value);

        ensure_label_available(&record, entry.label(), None)?;
        record.entries.insert(id.clone(), entry.clone());
        ensure_within_limit(&record, self.config.max_live_entries)?;

        let watermark = self.save(Operation::Create, raw.as_deref(), &mut record)?;
        info!(id = %id, %watermark, "Variable created");
        Ok(Mutation {
            variable: Variable::new(id, entry),
            watermark,
        })
    }

    /// Applies the fields present in `patch`. Deleted entries can be edited
    /// and stay deleted.
    pub fn update(&self, id: &VariableId, patch: UpdatePatch) -> VariableResult<Mutation> {
        let (raw, mut record) = self.read_for_write(Operation::Update)?;

        let mut entry = record
            .get(id)
            .cloned()
            .ok_or_else(|| VariableError::RecordNotFound(id.clone()))?;
        entry.apply(&patch);

        ensure_label_available(&record, entry.label(), Some(id))?;
        record.entries.insert(id.clone(), entry.clone());

        let watermark = self.save(Operation::Update, raw.as_deref(), &mut record)?;
        info!(id = %id, %watermark, "Variable updated");
        Ok(Mutation {
            variable: Variable::new(id.clone(), entry),
            watermark,
        })
    }

    /// Soft-deletes an entry. Deleting an already deleted entry succeeds and
    /// replaces its stamp.
    pub fn delete(&self, id: &VariableId) -> VariableResult<Mutation> {
        let (raw, mut record) = self.read_for_write(Operation::Delete)?;

        let mut entry = record
            .get(id)
            .cloned()
            .ok_or_else(|| VariableError::RecordNotFound(id.clone()))?;
        if !entry.is_live() {
            debug!(id = %id, "Re-deleting variable, stamp will be replaced");
        }
        entry.mark_deleted(DeletedAt::now());
        record.entries.insert(id.clone(), entry.clone());

        let watermark = self.save(Operation::Delete, raw.as_deref(), &mut record)?;
        info!(id = %id, %watermark, "Variable deleted");
        Ok(Mutation {
            variable: Variable::new(id.clone(), entry),
            watermark,
        })
    }

    /// Brings an entry back to life, optionally with a new label or value.
    pub fn restore(&self, id: &VariableId, overrides: UpdatePatch) -> VariableResult<Mutation> {
        let (raw, mut record) = self.read_for_write(Operation::Restore)?;

        let mut entry = record
            .get(id)
            .map(VariableEntry::restored)
            .ok_or_else(|| VariableError::RecordNotFound(id.clone()))?;
        entry.apply(&overrides);

        ensure_label_available(&record, entry.label(), Some(id))?;
        record.entries.insert(id.clone(), entry.clone());
        ensure_within_limit(&record, self.config.max_live_entries)?;

        let watermark = self.save(Operation::Restore, raw.as_deref(), &mut record)?;
        info!(id = %id, %watermark, "Variable restored");
        Ok(Mutation {
            variable: Variable::new(id.clone(), entry),
            watermark,
        })
    }

    fn read(&self) -> Loaded {
        let key = self.config.meta_key.as_str();
        let raw = self.store.read(key);

        let record = match raw.as_deref().map(VariableRecord::decode) {
            None => {
                debug!(key, "No stored variables, using empty record");
                Ok(VariableRecord::default())
            }
            Some(Ok(record)) => Ok(record.unwrap_or_default()),
            Some(Err(e)) => {
                warn!(key, error = %e, "Stored variables are unreadable, using empty record");
                Err(e)
            }
        };

        Loaded { raw, record }
    }

    /// Reads the record a mutation starts from. An unreadable blob is
    /// reported instead of being replaced by an empty record.
    fn read_for_write(
        &self,
        operation: Operation,
    ) -> VariableResult<(Option<Vec<u8>>, VariableRecord)> {
        let Loaded { raw, record } = self.read();
        match record {
            Ok(record) => Ok((raw, record)),
            Err(e) => {
                warn!(
                    key = self.config.meta_key.as_str(),
                    %operation,
                    "Refusing to overwrite unreadable variable record"
                );
                Err(VariableError::UnreadableRecord {
                    operation,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Advances the watermark and writes the record. `loaded` is the blob the
    /// record was read from, compared against in compare-and-set mode.
    fn save(
        &self,
        operation: Operation,
        loaded: Option<&[u8]>,
        record: &mut VariableRecord,
    ) -> VariableResult<Watermark> {
        record.watermark = record
            .watermark
            .next_wrapping_at(self.config.max_watermark);
        let blob = record.encode()?;
        let key = self.config.meta_key.as_str();

        let result = match self.config.write_mode {
            WriteMode::LastWriterWins => {
                if self.store.write(key, &blob) {
                    Ok(record.watermark)
                } else {
                    Err(VariableError::Fatal(operation))
                }
            }
            WriteMode::CompareAndSet => match self.store.compare_and_write(key, loaded, &blob) {
                CasOutcome::Written => Ok(record.watermark),
                CasOutcome::Conflict => Err(VariableError::Conflict(operation)),
                CasOutcome::Failed => Err(VariableError::Fatal(operation)),
            },
        };

        if let Err(e) = &result {
            warn!(key, %operation, error = %e, "Variable record write rejected");
        }
        result
    }
}
