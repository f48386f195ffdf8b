use crate::config::WIZARD_PROGRESS_PREFIX;
use crate::storage::{KeyValueStore, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted wizard progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot<D> {
    pub wizard_id: String,
    pub current_step_index: usize,
    pub data: D,
    pub saved_at: DateTime<Utc>,
}

impl<D> WizardSnapshot<D> {
    pub fn new(wizard_id: impl Into<String>, current_step_index: usize, data: D) -> Self {
        Self {
            wizard_id: wizard_id.into(),
            current_step_index,
            data,
            saved_at: Utc::now(),
        }
    }
}

pub fn storage_key(wizard_id: &str) -> String {
    format!("{WIZARD_PROGRESS_PREFIX}{wizard_id}")
}

pub fn save<D: Serialize>(
    store: &dyn KeyValueStore,
    snapshot: &WizardSnapshot<D>,
) -> Result<(), StorageError> {
    let value = serde_json::to_value(snapshot)?;
    store.set(&storage_key(&snapshot.wizard_id), &value)
}

/// Loads the snapshot for `wizard_id`. A stored snapshot written for another
/// wizard id reads as absent.
pub fn load<D: for<'de> Deserialize<'de>>(
    store: &dyn KeyValueStore,
    wizard_id: &str,
) -> Result<Option<WizardSnapshot<D>>, StorageError> {
    let Some(value) = store.get(&storage_key(wizard_id))? else {
        return Ok(None);
    };
    let snapshot: WizardSnapshot<D> = serde_json::from_value(value)?;
    if snapshot.wizard_id != wizard_id {
        return Ok(None);
    }
    Ok(Some(snapshot))
}

pub fn clear(store: &dyn KeyValueStore, wizard_id: &str) -> Result<(), StorageError> {
    store.remove(&storage_key(wizard_id))
}
