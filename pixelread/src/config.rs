use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_DIMENSION_ORDER;
use crate::error::{ReaderError, Result};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    // Labels readers fall back on, truncated from the front to the data's rank
    pub default_dimension_order: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_dimension_order: DEFAULT_DIMENSION_ORDER.to_string(),
        }
    }
}

impl ReaderConfig {
    /// Config from the user's config file, or `None` if it is missing or unreadable.
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write to the user's config file, returning where it went.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().ok_or(ReaderError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        let home = std::env::home_dir()?;
        Some(home.join(".config").join("pixelread").join("config.json"))
    }
}
