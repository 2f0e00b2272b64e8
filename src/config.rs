use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// TOML configuration. Every field has a default so a fresh install works
/// without any file on disk; an explicitly passed path must exist.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the sync API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// SQLite database location; defaults under the user's home directory.
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub location: Option<LocationConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceConfig {
    pub model: Option<String>,
    pub api_level: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

fn default_endpoint() -> String {
    "https://api-sl.coachdigital.org".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            database: None,
            device: DeviceConfig::default(),
            location: None,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };
        if !path.exists() {
            if required {
                anyhow::bail!("Config file {} does not exist", path.display());
            }
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn default_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home_dir.join(".field-sync").join("config.toml"))
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home_dir.join(".field-sync").join("field.db"))
    }
}
