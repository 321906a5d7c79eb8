//! Loading and saving the configuration file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::keys::{ComboError, KeyCombo, KeyboardLayout, Strings};
use crate::validate::ScanOptions;

const APP_NAME: &str = "hotkeyctl";

/// The configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Hotkeys registered by `listen` and shown by `list`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hotkeys: Vec<HotKeyConfig>,

    /// Which menu items `check` ignores.
    #[serde(default)]
    pub validator: ScanOptions,

    /// Overrides for the localization table, by key (`modifier.command`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub strings: BTreeMap<String, String>,
}

impl Config {
    /// Localization table with this file's overrides applied.
    pub fn strings(&self) -> Strings {
        Strings::with_overrides(&self.strings)
    }
}

/// One `[[hotkeys]]` entry.
///
/// The combination is either `shortcut = "cmd+shift+t"` or the mapping fields
/// `keyCode`, `keyEquivalent` and `modifierFlags`. `shortcut` wins when both
/// are present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HotKeyConfig {
    pub identifier: String,

    /// Display name; defaults to the identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,

    #[serde(flatten)]
    pub combo: KeyCombo,

    /// Shell command to run when the hotkey fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl HotKeyConfig {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.identifier)
    }

    /// The configured combination.
    ///
    /// # Errors
    ///
    /// Returns `ComboError` if `shortcut` does not parse.
    pub fn combo(&self, layout: &dyn KeyboardLayout) -> Result<KeyCombo, ComboError> {
        match &self.shortcut {
            Some(shortcut) => KeyCombo::parse(shortcut, layout),
            None => Ok(self.combo.clone()),
        }
    }
}

/// Locates, loads and saves the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the default location.
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Manager for an explicit file (`--config`).
    pub fn from_path(path: &Path) -> Self {
        Self {
            config_path: path.to_owned(),
        }
    }

    /// Manager for `<dir>/hotkeyctl.toml`.
    #[cfg(test)]
    pub fn with_config_dir<P: AsRef<Path>>(dir: P) -> Self {
        let config_path = dir.as_ref().join(format!("{APP_NAME}.toml"));
        Self { config_path }
    }

    /// `<config dir>/hotkeyctl/hotkeyctl.toml`.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to retrieve configuration directory")?;
        Ok(config_dir.join(APP_NAME).join(format!("{APP_NAME}.toml")))
    }

    /// Load the file, or the default configuration if it does not exist.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            debug!(path = ?self.config_path, "no config file, using defaults");
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file at {:?}", self.config_path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {:?}", self.config_path))?;
        debug!(path = ?self.config_path, hotkeys = config.hotkeys.len(), "config loaded");
        Ok(config)
    }

    /// Write the configuration, creating the directory if needed.
    pub fn save(&self, config: &Config) -> Result<()> {
        let config_dir = self
            .config_path
            .parent()
            .with_context(|| format!("Failed to get parent directory of {:?}", self.config_path))?;
        fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory at {config_dir:?}"))?;

        let serialized =
            toml::to_string_pretty(config).context("Failed to serialize configuration")?;
        fs::write(&self.config_path, serialized)
            .with_context(|| format!("Failed to write config file at {:?}", self.config_path))?;
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::keys::{Modifiers, UsAnsiLayout, l10n};

    #[test]
    fn test_load_missing_file_gives_default() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path().join("nested"));

        let mut config = Config::default();
        config.hotkeys.push(HotKeyConfig {
            identifier: "terminal".to_owned(),
            name: Some("Open Terminal".to_owned()),
            shortcut: None,
            combo: KeyCombo::from_key_code(17, Modifiers::COMMAND | Modifiers::OPTION, &UsAnsiLayout)
                .unwrap(),
            command: Some("open -a Terminal".to_owned()),
        });
        config.validator.skip_disabled = true;
        config
            .strings
            .insert(l10n::MODIFIER_COMMAND.to_owned(), "Cmd".to_owned());

        manager.save(&config).unwrap();
        assert!(manager.config_path().exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_parse_handwritten_file() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        fs::write(
            manager.config_path(),
            r#"
[validator]
skip_hidden = true

[strings]
"modifier.shift" = "Umschalt"

[[hotkeys]]
identifier = "notes"
shortcut = "ctrl+opt+n"
command = "open -a Notes"

[[hotkeys]]
identifier = "save"
keyCode = 1
keyEquivalent = "s"
modifierFlags = 1048576
"#,
        )
        .unwrap();

        let config = manager.load().unwrap();
        assert!(config.validator.skip_hidden);
        assert!(!config.validator.skip_disabled);
        assert_eq!(config.strings().get(l10n::MODIFIER_SHIFT), "Umschalt");

        let notes = config.hotkeys[0].combo(&UsAnsiLayout).unwrap();
        assert_eq!(notes.modifiers(), Modifiers::CONTROL | Modifiers::OPTION);
        assert_eq!(notes.key_equivalent(), "n");
        assert_eq!(config.hotkeys[0].name(), "notes");

        let save = config.hotkeys[1].combo(&UsAnsiLayout).unwrap();
        assert_eq!(save.modifiers(), Modifiers::COMMAND);
        assert_eq!(save.code(), Some(1));
    }

    #[test]
    fn test_parse_error_has_context() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        fs::write(manager.config_path(), "hotkeys = 3").unwrap();
        let err = manager.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
