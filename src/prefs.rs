//! Persistent key-value preferences
//!
//! The playground only stores the theme, but the store is a plain string map
//! so the page can be given more settings later without a format change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Named preference storage
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`; persistent stores write through immediately
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
}

/// Volatile store, used by tests and when no config directory exists
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by `~/.config/rubyfmt-playground/preferences.yaml`
#[derive(Debug, Clone)]
pub struct YamlPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl YamlPreferenceStore {
    /// Open the store at `path`; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed preferences at {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read preferences at {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    /// Open the store at its default location, if a config directory exists
    pub fn open_default() -> Option<Self> {
        crate::config_paths::preferences_file().map(Self::open)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            crate::config_paths::ensure_dir(parent)?;
        }
        let content = serde_yaml::to_string(&self.values)
            .map_err(|e| format!("Failed to serialize preferences: {}", e))?;
        std::fs::write(&self.path, content).map_err(|e| {
            format!(
                "Failed to write preferences to {}: {}",
                self.path.display(),
                e
            )
        })
    }
}

impl PreferenceStore for YamlPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.values.insert(key.to_string(), value.to_string());
        self.write()?;
        tracing::debug!("Saved preference {}={} to {}", key, value, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new().with("theme", "light");
        assert_eq!(store.get("theme").as_deref(), Some("light"));
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(store.get("missing"), None);
    }
}
