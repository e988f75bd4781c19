//! # Application configuration — `notepad.toml`
//!
//! Optional TOML file describing which table the notes live in and how the
//! global notepad persists itself. Every field has a default, so a missing or
//! empty file is equivalent to the default configuration.
//!
//! ## Structure
//!
//! ```toml
//! [service]
//! table = "notepad"               # remote table holding the notes
//!
//! [widget]
//! storage_key = "global_note"     # local storage key of the scratch pad
//! autosave_interval_secs = 30     # 0 disables timer saves
//! ```
//!
//! Service endpoint and key are not stored here; they come from the
//! environment (see the `api` crate).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::widget::{AUTOSAVE_INTERVAL, STORAGE_KEY};

/// Top-level configuration stored in `notepad.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotepadConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// Remote table settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "notepad".to_string()
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            table: default_table(),
        }
    }
}

/// Global notepad settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Auto-save interval in seconds. 0 disables timer saves.
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_secs: u64,
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

fn default_autosave_interval() -> u64 {
    AUTOSAVE_INTERVAL.as_secs()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            autosave_interval_secs: default_autosave_interval(),
        }
    }
}

impl WidgetConfig {
    /// The timer period, or `None` when timer saves are disabled.
    pub fn autosave_interval(&self) -> Option<Duration> {
        (self.autosave_interval_secs > 0).then(|| Duration::from_secs(self.autosave_interval_secs))
    }
}

impl NotepadConfig {
    /// Builder method to set the auto-save interval.
    pub fn with_autosave_interval(mut self, secs: u64) -> Self {
        self.widget.autosave_interval_secs = secs;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "notepad.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = NotepadConfig::from_toml("").unwrap();
        assert_eq!(config, NotepadConfig::default());
        assert_eq!(config.service.table, "notepad");
        assert_eq!(config.widget.storage_key, "global_note");
        assert_eq!(config.widget.autosave_interval(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = NotepadConfig::from_toml("[widget]\nautosave_interval_secs = 0\n").unwrap();
        assert_eq!(config.widget.autosave_interval(), None);
        assert_eq!(config.widget.storage_key, "global_note");
        assert_eq!(config.service.table, "notepad");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = NotepadConfig::default().with_autosave_interval(5);
        let text = config.to_toml().unwrap();
        assert_eq!(NotepadConfig::from_toml(&text).unwrap(), config);
    }
}
