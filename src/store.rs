//! Persisted user preferences: the saved-city list and the theme.
//!
//! Backends only deal with raw string values under fixed keys; decoding,
//! defaults and the corruption policy live in the provided trait methods so
//! every backend behaves the same.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::constants::{SAVED_CITIES_KEY, THEME_KEY};
use crate::error::StoreError;
use crate::models::{Preferences, Theme};

/// Durable key/value storage for preferences. Writes are immediate.
pub trait PreferenceStore: Send + Sync {
    /// Raw value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrites the raw value under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Reads both preferences, falling back to defaults for anything absent
    /// or unreadable.
    fn load(&self) -> Preferences {
        let cities = match self.get(SAVED_CITIES_KEY) {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt saved cities: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        let theme = match self.get(THEME_KEY) {
            Some(raw) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown theme: {:?}", raw);
                Theme::default()
            }),
            None => Theme::default(),
        };

        Preferences { cities, theme }
    }

    fn save_cities(&self, cities: &[String]) -> Result<(), StoreError> {
        let json = serde_json::to_string(cities)?;
        self.set(SAVED_CITIES_KEY, &json)
    }

    fn save_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.set(THEME_KEY, theme.as_str())
    }
}

/// Stores each key as a file in a data directory
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    dir: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read preference {}: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        tracing::debug!("Stored preference {} in {:?}", key, self.dir);
        Ok(())
    }
}

/// Non-durable store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(
            store.load(),
            Preferences {
                cities: vec![],
                theme: Theme::Light,
            }
        );
    }

    #[test]
    fn test_corrupt_cities_treated_as_absent() {
        let store = MemoryPreferenceStore::new();
        store.set(SAVED_CITIES_KEY, "{not json").unwrap();
        store.set(THEME_KEY, "dark").unwrap();

        let prefs = store.load();

        assert!(prefs.cities.is_empty());
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[test]
    fn test_wrong_shape_treated_as_absent() {
        let store = MemoryPreferenceStore::new();
        store.set(SAVED_CITIES_KEY, r#"{"cities":["Oslo"]}"#).unwrap();
        assert!(store.load().cities.is_empty());
    }

    #[test]
    fn test_unknown_theme_defaults_to_light() {
        let store = MemoryPreferenceStore::new();
        store.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(store.load().theme, Theme::Light);
    }

    #[test]
    fn test_save_writes_through() {
        let store = MemoryPreferenceStore::new();
        store
            .save_cities(&["Oslo".to_string(), "Lima".to_string()])
            .unwrap();
        store.save_theme(Theme::Dark).unwrap();

        assert_eq!(
            store.get(SAVED_CITIES_KEY).as_deref(),
            Some(r#"["Oslo","Lima"]"#)
        );
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("prefs");

        let store = FilePreferenceStore::new(&dir);
        assert_eq!(store.load(), Preferences::default());
        store.save_cities(&["Tokyo".to_string()]).unwrap();
        store.save_theme(Theme::Dark).unwrap();

        let reopened = FilePreferenceStore::new(&dir);
        assert_eq!(
            reopened.load(),
            Preferences {
                cities: vec!["Tokyo".to_string()],
                theme: Theme::Dark,
            }
        );
    }

    #[test]
    fn test_file_store_keys_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(tmp.path());

        store.save_theme(Theme::Dark).unwrap();
        fs::write(tmp.path().join(SAVED_CITIES_KEY), "garbage").unwrap();

        let prefs = store.load();
        assert!(prefs.cities.is_empty());
        assert_eq!(prefs.theme, Theme::Dark);
    }
}
