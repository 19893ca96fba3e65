//! Settings repository for per-user preferences

use std::fs;
use std::path::PathBuf;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::warn;

/// Key/value store for per-user preferences, injected into views that
/// persist state. Values are JSON so callers define their own shapes.
///
/// Storage failures are logged and swallowed, never surfaced to the UI;
/// a missing or unreadable value simply reads as `None`.
pub trait SettingsRepository: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
}

/// JSON-file-backed settings. The file is read once at construction and
/// rewritten whole on every `set`; the lifecycle is application start to
/// stop, with the instance owned by the app and shared by reference.
pub struct JsonFileSettings {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonFileSettings {
    pub fn load(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Map<String, Value>>(&text) {
                Ok(map) => map,
                Err(error) => {
                    warn!("ignoring unreadable settings file {:?}: {}", path, error);
                    Map::new()
                }
            },
            // A missing file is the first-run case, not an error.
            Err(_) => Map::new(),
        };

        Self {
            path,
            values: RwLock::new(values),
        }
    }

    fn write_through(&self, values: &Map<String, Value>) {
        match serde_json::to_string_pretty(values) {
            Ok(text) => {
                if let Err(error) = fs::write(&self.path, text) {
                    warn!("failed to write settings file {:?}: {}", self.path, error);
                }
            }
            Err(error) => warn!("failed to serialize settings: {}", error),
        }
    }
}

impl SettingsRepository for JsonFileSettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let mut values = self.values.write();
        values.insert(key.to_string(), value);
        self.write_through(&values);
    }
}

/// In-memory settings, used by tests.
#[derive(Default)]
pub struct MemorySettings {
    values: RwLock<Map<String, Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsRepository for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_settings_roundtrip() {
        let settings = MemorySettings::new();
        assert_eq!(settings.get("missing"), None);

        settings.set("key", json!(["a", "b"]));
        assert_eq!(settings.get("key"), Some(json!(["a", "b"])));

        settings.set("key", json!(["c"]));
        assert_eq!(settings.get("key"), Some(json!(["c"])));
    }

    #[test]
    fn test_file_settings_persist_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = JsonFileSettings::load(path.clone());
        assert_eq!(settings.get("columns"), None);
        settings.set("columns", json!(["pid", "name"]));
        drop(settings);

        let reloaded = JsonFileSettings::load(path);
        assert_eq!(reloaded.get("columns"), Some(json!(["pid", "name"])));
    }

    #[test]
    fn test_file_settings_tolerate_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let settings = JsonFileSettings::load(path.clone());
        assert_eq!(settings.get("columns"), None);

        // Writing still works and replaces the corrupt content.
        settings.set("columns", json!([]));
        let reloaded = JsonFileSettings::load(path);
        assert_eq!(reloaded.get("columns"), Some(json!([])));
    }
}
