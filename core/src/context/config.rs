use std::path::{Path, PathBuf};

use eqchannel_types::NumberFormat;
use serde::{Deserialize, Serialize};

use super::character::DEFAULT_INFRASTRUCTURE_TOKENS;
use crate::error::ConfigError;

pub const APP_NAME: &str = "eqchannel";

/// Persistent settings, stored as TOML in the platform config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned for `*.txt` character logs.
    pub log_directory: String,
    /// Record stream written by `parse`.
    pub raw_output: String,
    /// Record stream written by `enrich` and read by the reports.
    pub enriched_output: String,
    /// Filename fragments skipped when deriving the character name.
    pub infrastructure_tokens: Vec<String>,
    /// Optional TOML spell-level table.
    pub spell_table: Option<PathBuf>,
    /// Optional directory of cached raw wiki spell pages.
    pub wiki_cache_dir: Option<PathBuf>,
    /// Process log files on the rayon pool.
    pub parallel: bool,
    pub number_format: NumberFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_directory: "./logs".to_string(),
            raw_output: "channeling_data.csv".to_string(),
            enriched_output: "channeling_data_cleaned.csv".to_string(),
            infrastructure_tokens: DEFAULT_INFRASTRUCTURE_TOKENS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            spell_table: None,
            wiki_cache_dir: None,
            parallel: true,
            number_format: NumberFormat::Standard,
        }
    }
}

impl AppConfig {
    /// Load from the default location, creating it with defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, None).map_err(ConfigError::Load)
    }

    /// Load from an explicit path, creating it with defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        confy::load_path(path).map_err(ConfigError::Load)
    }

    /// Write back to `path`, or the default location when `None`.
    pub fn store(&self, path: Option<&Path>) -> Result<(), ConfigError> {
        match path {
            Some(path) => confy::store_path(path, self).map_err(ConfigError::Store),
            None => confy::store(APP_NAME, None, self).map_err(ConfigError::Store),
        }
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, None).map_err(ConfigError::Path)
    }

    /// Spell table from config, falling back to the per-user default if it exists.
    pub fn spell_table_path(&self) -> Option<PathBuf> {
        self.spell_table
            .clone()
            .or_else(|| default_spell_table().filter(|p| p.exists()))
    }
}

/// Resolve a log file path, joining with log_directory if relative.
pub fn resolve_log_path(config: &AppConfig, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(&config.log_directory).join(path)
    }
}

/// Per-user spell table location (`<config_dir>/eqchannel/spells.toml`).
pub fn default_spell_table() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join("spells.toml"))
}
