//! Checks run against the prospective record before it is written.

use tracing::debug;
use varstore_model::VariableRecord;
use varstore_types::VariableId;

use crate::error::{VariableError, VariableResult};

/// Fails if a live entry other than `except` already uses `label`. An entry
/// without a label never collides.
pub(crate) fn ensure_label_available(
    record: &VariableRecord,
    label: Option<&str>,
    except: Option<&VariableId>,
) -> VariableResult<()> {
    let Some(label) = label else {
        return Ok(());
    };
    match record.find_live_label(label, except) {
        Some(existing) => {
            debug!(label, existing = %existing, "Rejecting duplicated label");
            Err(VariableError::DuplicatedLabel(label.to_string()))
        }
        None => Ok(()),
    }
}

/// Fails if the record holds more than `max` live entries.
pub(crate) fn ensure_within_limit(record: &VariableRecord, max: usize) -> VariableResult<()> {
    let live = record.live_count();
    if live > max {
        debug!(live, max, "Rejecting mutation over live entry limit");
        return Err(VariableError::VariablesLimitReached(max));
    }
    Ok(())
}
