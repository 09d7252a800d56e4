//! Configuration file handling for patune
//!
//! A config file has two sections:
//! - `[tower]`: the physical and print parameters of the tuning tower
//! - `[output]`: firmware flavor and output decoration
//!
//! Both TOML and JSON are accepted, chosen by file extension. Missing keys
//! fall back to their defaults, so a file only needs the values that differ.

use crate::error::{SettingsError, SettingsResult};
use patune_core::{Flavor, Result};
use patune_toolpath::{TowerGenerator, TowerParameters};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Firmware dialect
    pub flavor: Flavor,
    /// Prepend `;` comments describing the tower
    pub header_comments: bool,
}

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) => Err(SettingsError::UnsupportedFormat(ext.to_string())),
            None => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tower parameters
    pub tower: TowerParameters,
    /// Output settings
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(&content)?,
            ConfigFormat::Json => serde_json::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.tower.validate()
    }

    /// Build a generator for this configuration
    pub fn generator(&self) -> Result<TowerGenerator> {
        Ok(TowerGenerator::new(self.tower.clone())?
            .with_flavor(self.output.flavor)
            .with_header_comments(self.output.header_comments))
    }
}
