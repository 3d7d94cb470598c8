use crate::catalog::CATALOG_KEY;
use crate::error::{NotekitError, Result};
use crate::search::SearchOptions;
use crate::settings::{StalePinPolicy, DEFAULT_SETTINGS_KEY};
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};

/// Store key the config document lives under.
pub const CONFIG_KEY: &str = "config";

/// Configuration for notekit, kept in the document store under [`CONFIG_KEY`]
/// (`<data dir>/config.json` for a `FileStore`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct NotekitConfig {
    /// What to do with pins whose notebook, topic or tag was deleted
    #[serde(default)]
    pub stale_pins: StalePinPolicy,

    /// Store key the settings document lives under
    #[serde(default = "default_settings_key")]
    pub settings_key: String,

    /// Default options for `find`
    #[serde(default)]
    pub search: SearchOptions,
}

fn default_settings_key() -> String {
    DEFAULT_SETTINGS_KEY.to_string()
}

impl Default for NotekitConfig {
    fn default() -> Self {
        Self {
            stale_pins: StalePinPolicy::default(),
            settings_key: default_settings_key(),
            search: SearchOptions::default(),
        }
    }
}

impl NotekitConfig {
    /// Load the config document, or defaults if none was saved yet.
    pub fn load<S: DocumentStore>(store: &S) -> Result<Self> {
        Ok(store.read_doc(CONFIG_KEY)?.unwrap_or_default())
    }

    pub fn save<S: DocumentStore>(&self, store: &S) -> Result<()> {
        store.write_doc(CONFIG_KEY, self)
    }

    /// Value of a single key, as shown by `notekit config <key>`
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "stale-pins" => Ok(self.stale_pins.to_string()),
            "settings-key" => Ok(self.settings_key.clone()),
            "match-case" => Ok(self.search.match_case.to_string()),
            "whole-word" => Ok(self.search.match_whole_word.to_string()),
            "regex" => Ok(self.search.enable_regex.to_string()),
            other => Err(NotekitError::Api(format!("Unknown config key: {}", other))),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "stale-pins" => self.stale_pins = value.parse()?,
            "settings-key" => {
                crate::store::validate_key(value)?;
                if value == CONFIG_KEY || value == CATALOG_KEY {
                    return Err(NotekitError::Api(format!(
                        "'{}' is reserved, pick another settings key",
                        value
                    )));
                }
                self.settings_key = value.to_string();
            }
            "match-case" => self.search.match_case = parse_flag(value)?,
            "whole-word" => self.search.match_whole_word = parse_flag(value)?,
            "regex" => self.search.enable_regex = parse_flag(value)?,
            other => return Err(NotekitError::Api(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["stale-pins", "settings-key", "match-case", "whole-word", "regex"]
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(NotekitError::Api(format!("Expected true or false, got '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = NotekitConfig::default();
        assert_eq!(config.stale_pins, StalePinPolicy::Keep);
        assert_eq!(config.settings_key, "settings");
        assert_eq!(config.search, SearchOptions::default());
    }

    #[test]
    fn test_load_missing_config() {
        let store = InMemoryStore::new();
        let config = NotekitConfig::load(&store).unwrap();
        assert_eq!(config, NotekitConfig::default());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let store = InMemoryStore::new();

        let mut config = NotekitConfig::default();
        config.set("stale-pins", "unpin").unwrap();
        config.set("regex", "on").unwrap();
        config.save(&store).unwrap();

        let loaded = NotekitConfig::load(&store).unwrap();
        assert_eq!(loaded.stale_pins, StalePinPolicy::Unpin);
        assert!(loaded.search.enable_regex);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let store = InMemoryStore::new();
        store.write(CONFIG_KEY, &json!({"stale-pins": "skip"})).unwrap();

        let loaded = NotekitConfig::load(&store).unwrap();
        assert_eq!(loaded.stale_pins, StalePinPolicy::Skip);
        assert_eq!(loaded.settings_key, "settings");
    }

    #[test]
    fn test_get_and_set_reject_unknown_keys() {
        let mut config = NotekitConfig::default();
        assert!(config.get("file-ext").is_err());
        assert!(config.set("file-ext", ".md").is_err());
        assert!(config.set("match-case", "maybe").is_err());
        assert!(config.set("settings-key", "../x").is_err());
    }

    #[test]
    fn test_settings_key_cannot_shadow_other_documents() {
        let mut config = NotekitConfig::default();
        assert!(config.set("settings-key", "config").is_err());
        assert!(config.set("settings-key", "catalog").is_err());
        assert_eq!(config.settings_key, "settings");
    }

    #[test]
    fn test_every_listed_key_is_readable() {
        let config = NotekitConfig::default();
        for key in NotekitConfig::keys() {
            assert!(config.get(key).is_ok(), "key {} not readable", key);
        }
    }
}
