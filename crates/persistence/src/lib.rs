#![deny(warnings)]

//! Persistence layer: saved farm sessions.
//!
//! The game only needs three capabilities: load the last saved state, save the
//! current state, and clear it on reset. [`StateStore`] captures that; the
//! implementations here keep it in memory, in a JSON document, or in SQLite.

mod sqlite;

pub use sqlite::{clear_state, init_db, load_state, save_state, SqliteStore};

use anyhow::{anyhow, Context, Result};
use farm_core::FarmState;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Slot name used for the single active session.
pub const DEFAULT_SLOT: &str = "current_session";

/// Returns the default SQLite URL used for local saves.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/farm.db"
}

/// Returns the default JSON save path.
pub fn default_save_path() -> PathBuf {
    PathBuf::from("saves").join(format!("{DEFAULT_SLOT}.json"))
}

/// Backend for the single saved session.
///
/// Errors are returned to the caller, who is expected to log them and carry
/// on with the in-memory state.
pub trait StateStore: Send {
    /// Last saved state, or `None` if nothing was saved.
    fn load(&mut self) -> Result<Option<FarmState>>;
    fn save(&mut self, state: &FarmState) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// In-process store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<FarmState>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a state, as if a previous session had saved it.
    pub fn with_state(state: FarmState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(state))),
        }
    }

    /// Copy of whatever is currently saved.
    pub fn snapshot(&self) -> Option<FarmState> {
        self.slot.lock().ok().and_then(|g| g.clone())
    }
}

impl StateStore for MemoryStore {
    fn load(&mut self) -> Result<Option<FarmState>> {
        Ok(self.snapshot())
    }

    fn save(&mut self, state: &FarmState) -> Result<()> {
        let mut guard = self.slot.lock().map_err(|_| anyhow!("memory store poisoned"))?;
        *guard = Some(state.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let mut guard = self.slot.lock().map_err(|_| anyhow!("memory store poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// One pretty-printed JSON document on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<FarmState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let state = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &FarmState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(state)?;
        // The save file is only ever replaced whole.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        debug!(path = %self.path.display(), week = state.week, "session saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("removing {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::{FarmType, Status};
    use proptest::prelude::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("farm-persistence-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[test]
    fn url_is_sqlite() {
        assert!(default_sqlite_url().starts_with("sqlite://"));
        assert!(default_save_path().ends_with("current_session.json"));
    }

    #[test]
    fn memory_store_clones_share_slot() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        let state = FarmState {
            week: 3,
            ..FarmState::default()
        };
        writer.save(&state).unwrap();
        assert_eq!(store.snapshot().unwrap().week, 3);
        writer.clear().unwrap();
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn json_store_roundtrip_and_clear() {
        let path = temp_path("roundtrip");
        let mut store = JsonFileStore::new(&path);
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        let state = FarmState {
            farm_name: Some("Doom Acres".into()),
            status: Status::Playing,
            farm_type: Some(FarmType::MixedVegPoultry),
            money: -1_250,
            ..FarmState::default()
        };
        store.save(&state).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"farmName\": \"Doom Acres\""));
        assert_eq!(store.load().unwrap(), Some(state));

        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn json_store_reports_corrupt_file() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
        store.clear().unwrap();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn json_store_keeps_unbounded_values(money in any::<i64>(), pest in -100i64..200, week in 0u32..30) {
            let path = temp_path(&format!("prop-{week}"));
            let mut store = JsonFileStore::new(&path);
            let state = FarmState { money, hidden_pest_risk: pest, week, ..FarmState::default() };
            store.save(&state).unwrap();
            prop_assert_eq!(store.load().unwrap(), Some(state));
            store.clear().unwrap();
        }
    }
}
