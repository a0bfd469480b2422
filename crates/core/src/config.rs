//! Configuration loading
//!
//! Settings live in `charla.toml`. Lookup order: an explicit path, the
//! `CHARLA_CONFIG` environment variable, the working directory, then the
//! platform config directory. Implicit files that are missing or broken
//! fall back to defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// File name searched in the working and config directories
pub const CONFIG_FILE: &str = "charla.toml";

/// Subdirectory under the platform config directory
const CONFIG_SUBDIR: &str = "charla";

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub nlp: NlpConfig,
}

/// Assistant persona and session timing
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// Delay before the session ends after a soft farewell ("adiós", "gracias")
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}

fn default_name() -> String {
    "ChatNico".to_string()
}

fn default_close_delay_ms() -> u64 {
    3000
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            close_delay_ms: default_close_delay_ms(),
        }
    }
}

impl AssistantConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

/// Text-pipeline model settings
#[derive(Debug, Clone, Deserialize)]
pub struct NlpConfig {
    /// Load the morphological analyzer
    #[serde(default = "default_morphology")]
    pub morphology: bool,

    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Extra dictionary forms for the basic lemmatizer
    #[serde(default)]
    pub lexicon: Option<PathBuf>,

    /// Supplement for the morphological analyzer; unreadable means unavailable
    #[serde(default)]
    pub morph_model: Option<PathBuf>,
}

fn default_morphology() -> bool {
    true
}

fn default_max_input_chars() -> usize {
    10_000
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            morphology: default_morphology(),
            max_input_chars: default_max_input_chars(),
            lexicon: None,
            morph_model: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl Config {
    /// Parse a config file, failing on any read or parse error
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.resolve_relative_paths(path.parent());
        Ok(config)
    }

    /// Load from an explicit path, or search the implicit locations
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::load_implicit(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_implicit() -> Self {
        for path in candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded configuration");
                    return config;
                }
                Err(e) => {
                    warn!("{}, using defaults", e);
                    return Self::default();
                }
            }
        }
        Self::default()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("CHARLA_MORPHOLOGY") {
            if let Some(enabled) = parse_flag(&value) {
                self.nlp.morphology = enabled;
            }
        }
    }

    /// Model paths in the file are relative to the file itself
    fn resolve_relative_paths(&mut self, base: Option<&Path>) {
        let Some(base) = base else { return };
        for path in [&mut self.nlp.lexicon, &mut self.nlp.morph_model]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(p) = std::env::var("CHARLA_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE));
    }
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(CONFIG_SUBDIR).join(CONFIG_FILE));
    }
    paths
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
