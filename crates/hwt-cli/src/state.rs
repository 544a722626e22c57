//! Session state persistence.
//!
//! The CLI keeps its collections in a [`MemoryStore`] and round-trips them
//! through a JSON snapshot file between invocations, so a session works
//! end-to-end without an external database.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use hwt_store::{MemoryStore, StoreSnapshot};

/// Load the store from the snapshot file, or start empty when there is no
/// state path or no file yet.
pub fn load_store(path: Option<&Path>) -> Result<MemoryStore> {
    let Some(path) = path else {
        return Ok(MemoryStore::new());
    };
    if !path.exists() {
        return Ok(MemoryStore::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read state file {}", path.display()))?;
    let snapshot: StoreSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parse state file {}", path.display()))?;
    Ok(MemoryStore::from_snapshot(snapshot))
}

/// Write the store back to the snapshot file, when one is configured.
pub fn save_store(path: Option<&Path>, store: &MemoryStore) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let snapshot = store.snapshot().context("snapshot store")?;
    let raw = serde_json::to_string_pretty(&snapshot).context("serialize state")?;
    fs::write(path, raw).with_context(|| format!("write state file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "state saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use hwt_model::Hospital;
    use hwt_store::WaitTimeStore;

    use super::*;

    #[test]
    fn state_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = load_store(Some(&path)).unwrap();
        store
            .upsert_hospital(Hospital {
                id: "101".to_string(),
                name: "Hospital de Santa Maria".to_string(),
                ..Hospital::default()
            })
            .unwrap();
        save_store(Some(&path), &store).unwrap();

        let reloaded = load_store(Some(&path)).unwrap();
        assert_eq!(
            reloaded.hospital("101").unwrap().unwrap().name,
            "Hospital de Santa Maria"
        );
    }

    #[test]
    fn missing_state_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(Some(&dir.path().join("absent.json"))).unwrap();
        assert!(store.hospital("101").unwrap().is_none());
    }
}
