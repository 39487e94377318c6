//! Engine configuration
//!
//! Read from a TOML file; every key is optional. A couple of environment variables
//! override the file so test rigs can point at a data set without editing it.

use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding catalogs, scripts and talk text
    pub data_dir: PathBuf,
    /// Directory holding numbered save slots; defaults to the data directory
    pub save_dir: Option<PathBuf>,
    /// Base name of the script archive
    pub script_archive: String,
    /// Base name of the talk-text archive
    pub talk_archive: String,
    /// Fixed RNG seed; unset means truly random
    pub seed: Option<u64>,
    /// Item id that counts as money
    pub money_item: i16,
    /// Sub-map a new game starts in, -1 for the overworld
    pub start_submap: i16,
    /// Answer the headless frontend gives to yes/no prompts and battles
    pub headless_answer: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            data_dir: PathBuf::from("data"),
            save_dir: None,
            script_archive: "KDEF".to_string(),
            talk_archive: "TALK".to_string(),
            seed: None,
            money_item: 174,
            start_submap: 70,
            headless_answer: true,
        }
    }
}

impl EngineConfig {
    /// Parse TOML text
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid configuration: {e}"))
    }

    /// Load from a file, falling back to defaults when it does not exist, then apply overrides
    pub fn load(path: &Path) -> Result<Self, String> {
        let mut config = if path.exists() {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {:?}: {}", path, e))?;
            info!("Loaded configuration from {:?}", path);
            Self::from_toml(&text)?
        } else {
            debug!("No configuration at {:?}, using defaults", path);
            EngineConfig::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("WULIN_DATA_DIR") {
            debug!("WULIN_DATA_DIR overrides data_dir: {}", dir);
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(seed) = std::env::var("WULIN_SEED") {
            match seed.parse() {
                Ok(s) => self.seed = Some(s),
                Err(_) => debug!("Ignoring unparsable WULIN_SEED {:?}", seed),
            }
        }
    }

    pub fn save_dir(&self) -> &Path {
        self.save_dir.as_deref().unwrap_or(&self.data_dir)
    }

    pub fn script_base(&self) -> PathBuf {
        self.data_dir.join(&self.script_archive)
    }

    pub fn talk_base(&self) -> PathBuf {
        self.data_dir.join(&self.talk_archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml("data_dir = \"game\"\nseed = 42\n").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("game"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.script_archive, "KDEF");
        assert_eq!(config.save_dir(), Path::new("game"));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(EngineConfig::from_toml("seed = \"many\"").is_err());
    }
}
