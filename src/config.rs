//! Configuration loader/writer plus strongly typed settings structures.
//!
//! Settings live in a single `config.toml` under the data directory. The
//! shipped defaults are embedded at compile time and written out on first
//! run; `save settings` writes the current values back.

use crate::core::host::ToolbarStyle;
use crate::priority::PriorityLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub mod keybind_validator;

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "GAMMON_TOOLBAR_DIR";

/// Top-level configuration object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub toolbar: ToolbarConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub system: SystemConfig,
    /// Key combo -> action name
    #[serde(default = "default_keybinds")]
    pub keybinds: BTreeMap<String, String>,
    #[serde(skip)] // Set at load time, where `save` writes back to
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolbarConfig {
    #[serde(default)]
    pub style: ToolbarStyle,
    #[serde(default)]
    pub clockwise: bool,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            style: ToolbarStyle::Both,
            clockwise: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    #[serde(default = "default_match_length")]
    pub default_match_length: u32,
    #[serde(default)]
    pub computer_player: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_match_length: default_match_length(),
            computer_player: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemConfig {
    #[serde(default)]
    pub priority: PriorityLevel,
}

fn default_match_length() -> u32 {
    7
}

/// Keybinds from the embedded defaults
pub fn default_keybinds() -> BTreeMap<String, String> {
    Config::embedded_defaults()
        .map(|config| config.keybinds)
        .unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toolbar: ToolbarConfig::default(),
            game: GameConfig::default(),
            system: SystemConfig::default(),
            keybinds: default_keybinds(),
            path: None,
        }
    }
}

impl Config {
    /// Parse the defaults shipped inside the binary
    pub fn embedded_defaults() -> Result<Self> {
        #[derive(Deserialize)]
        struct Defaults {
            toolbar: ToolbarConfig,
            game: GameConfig,
            system: SystemConfig,
            keybinds: BTreeMap<String, String>,
        }

        let defaults: Defaults =
            toml::from_str(DEFAULT_CONFIG).context("Failed to parse embedded default config")?;
        Ok(Self {
            toolbar: defaults.toolbar,
            game: defaults.game,
            system: defaults.system,
            keybinds: defaults.keybinds,
            path: None,
        })
    }

    /// Load `config.toml` from the data directory, writing the defaults
    /// there first if it does not exist yet
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::extract_defaults(&path)?;
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.path = Some(path.to_path_buf());

        let validation = keybind_validator::validate_keybinds(&config.keybinds);
        for issue in &validation.issues {
            tracing::warn!("Keybind issue: {}", issue.message());
        }
        if validation.has_errors() {
            let fixed = keybind_validator::auto_fix_keybinds(&mut config.keybinds, &validation.issues);
            if fixed > 0 {
                tracing::info!("Auto-fixed {} keybind issues", fixed);
            }
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write the embedded defaults to `path` unless a file is already there
    fn extract_defaults(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
        }
        fs::write(path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write default config: {:?}", path))?;
        tracing::info!("Created default config at {:?}", path);
        Ok(())
    }

    /// Write back to the file this config was loaded from (or the default
    /// location)
    pub fn save(&self) -> Result<()> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => Self::config_path()?,
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Base data directory (~/.gammon-toolbar), overridable with
    /// GAMMON_TOOLBAR_DIR
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".gammon-toolbar"))
    }

    /// Returns: ~/.gammon-toolbar/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Returns: ~/.gammon-toolbar/gammon-toolbar.log
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("gammon-toolbar.log"))
    }

    /// Returns: ~/.gammon-toolbar/history.txt
    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("history.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let config = Config::embedded_defaults().unwrap();
        assert_eq!(config.toolbar.style, ToolbarStyle::Both);
        assert!(!config.toolbar.clockwise);
        assert_eq!(config.game.default_match_length, 7);
        assert_eq!(config.system.priority, PriorityLevel::Normal);
        assert_eq!(config.keybinds.get("F2").map(String::as_str), Some("Double"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[toolbar]\nstyle = \"icons\"\n").unwrap();
        assert_eq!(config.toolbar.style, ToolbarStyle::IconsOnly);
        assert!(!config.toolbar.clockwise);
        assert_eq!(config.game.default_match_length, 7);
        assert!(!config.keybinds.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.toolbar.style = ToolbarStyle::TextOnly;
        config.toolbar.clockwise = true;
        config.system.priority = PriorityLevel::BelowNormal;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.toolbar.style, ToolbarStyle::TextOnly);
        assert!(loaded.toolbar.clockwise);
        assert_eq!(loaded.system.priority, PriorityLevel::BelowNormal);
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("style = \"text\""));
        assert!(text.contains("priority = \"belownormal\""));
    }

    #[test]
    fn test_extract_defaults_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::extract_defaults(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        fs::write(&path, "[toolbar]\nclockwise = true\n").unwrap();
        Config::extract_defaults(&path).unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert!(config.toolbar.clockwise);
    }

    #[test]
    fn test_bad_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[toolbar]\nstyle = \"huge\"\n").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
