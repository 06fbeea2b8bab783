//! Application configuration.
//!
//! Settings come from a JSON file (`config.json`). Every field has a default,
//! so a partial file, or none at all, is a valid configuration.
//!
//! # Example
//!
//! ```rust
//! use chatscribe_core::{AppConfig, HeadingStyle};
//!
//! let config: AppConfig = serde_json::from_str(r#"{"settings": {"heading_style": "SETEXT"}}"#).unwrap();
//! assert_eq!(config.settings.heading_style, HeadingStyle::Setext);
//! assert_eq!(config.settings.max_filename_length, 50);
//! assert_eq!(config.default_save_folder, "Exported_Notes");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{ChatscribeError, Result};

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Subdirectory of the platform config dir holding [`CONFIG_FILE_NAME`].
pub const CONFIG_DIR_NAME: &str = "chatscribe";

/// Heading syntax of the rendered Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeadingStyle {
    /// `# Heading`
    #[default]
    #[serde(rename = "ATX", alias = "atx")]
    Atx,
    /// Heading underlined with `=` or `-`
    #[serde(rename = "SETEXT", alias = "setext", alias = "SETEX", alias = "UNDERLINED")]
    Setext,
}

/// Export behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterSettings {
    /// Remove copy buttons and code toolbars from answers
    pub strip_buttons: bool,
    /// Prepend YAML frontmatter to new notes
    pub include_metadata: bool,
    /// strftime format of the frontmatter date
    pub date_format: String,
    pub heading_style: HeadingStyle,
    /// Upper bound for generated titles and file names
    pub max_filename_length: usize,
    /// Turn search phrases into tidy titles
    pub smart_titles: bool,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            strip_buttons: true,
            include_metadata: true,
            date_format: "%Y-%m-%d".to_string(),
            heading_style: HeadingStyle::Atx,
            max_filename_length: 50,
            smart_titles: true,
        }
    }
}

/// OpenAI-compatible title service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub enabled: bool,
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 10,
        }
    }
}

impl AiSettings {
    /// True when remote titles are switched on and a key is present.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Folder notes are written to, created on demand
    pub default_save_folder: String,
    /// Folder watched and scanned for saved pages; empty means the OS default
    pub downloads_path: String,
    pub settings: ExporterSettings,
    pub ai: AiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_save_folder: "Exported_Notes".to_string(),
            downloads_path: String::new(),
            settings: ExporterSettings::default(),
            ai: AiSettings::default(),
        }
    }
}

impl AppConfig {
    /// Parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ChatscribeError::ConfigError`] if the file cannot be read or
    /// is not valid JSON for this schema.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ChatscribeError::ConfigError(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| ChatscribeError::ConfigError(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Loads the configuration, never failing.
    ///
    /// An explicit path is used on its own. Otherwise `./config.json` is
    /// tried, then `<config dir>/chatscribe/config.json`. A missing or
    /// malformed file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let candidates = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => Self::default_locations(),
        };

        let Some(path) = candidates.iter().find(|path| path.is_file()) else {
            warn!(?candidates, "config file not found, using defaults");
            return Self::default();
        };

        match Self::from_file(path) {
            Ok(config) => {
                info!(path = %path.display(), "config loaded");
                config
            }
            Err(e) => {
                error!(error = %e, "using default config");
                Self::default()
            }
        }
    }

    /// Files consulted when no explicit path is given, in order.
    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            locations.push(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        locations
    }

    /// Folder notes are saved to.
    pub fn save_folder(&self) -> PathBuf {
        PathBuf::from(&self.default_save_folder)
    }

    /// Folder holding saved chat pages.
    ///
    /// Falls back to the platform download directory, then `~/Downloads`.
    pub fn downloads_dir(&self) -> PathBuf {
        if !self.downloads_path.trim().is_empty() {
            return PathBuf::from(&self.downloads_path);
        }

        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .unwrap_or_else(|| PathBuf::from("Downloads"))
    }
}
