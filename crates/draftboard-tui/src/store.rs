// JSON persistence for the watchlist and player notes.
//
// The whole store is rewritten on every change. Writes go to a sibling
// temp file first and are renamed into place so a crash never leaves a
// half-written store behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::protocol::WatchlistEntry;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("corrupt store {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub watchlist: Vec<WatchlistEntry>,
    #[serde(default)]
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store. A missing file is an empty store.
    pub fn load(&self) -> Result<StoreData, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no store at {}, starting empty", self.path.display());
                return Ok(StoreData::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        let data: StoreData = serde_json::from_str(&text).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        info!(
            "loaded store from {}: {} watchlisted, {} notes",
            self.path.display(),
            data.watchlist.len(),
            data.notes.len()
        );
        Ok(data)
    }

    pub fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(data).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        debug!("store saved to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn temp_store(name: &str) -> (PathBuf, Store) {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        let store = Store::new(dir.join("nested").join("store.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (dir, store) = temp_store("draftboard_store_test_missing");
        assert_eq!(store.load().unwrap(), StoreData::default());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_then_load_preserves_contents() {
        let (dir, store) = temp_store("draftboard_store_test_save");
        let mut data = StoreData::default();
        data.watchlist.push(WatchlistEntry {
            id: "1".into(),
            name: "Josh Allen".into(),
            added_at: Utc.with_ymd_and_hms(2026, 8, 30, 19, 5, 0).unwrap(),
        });
        data.notes.insert("1".into(), "rushing floor".into());

        store.save(&data).unwrap();
        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
        assert_eq!(store.load().unwrap(), data);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let (dir, store) = temp_store("draftboard_store_test_corrupt");
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Json { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_sections_default() {
        let (dir, store) = temp_store("draftboard_store_test_partial");
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"notes": {"7": "handcuff"}}"#).unwrap();
        let data = store.load().unwrap();
        assert!(data.watchlist.is_empty());
        assert_eq!(data.notes.get("7").map(String::as_str), Some("handcuff"));
        let _ = fs::remove_dir_all(&dir);
    }
}
