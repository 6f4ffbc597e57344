//! Layered application configuration.
//!
//! Values come from built-in defaults, then `config.toml` in the user config
//! directory, then `GAME_EXPLORER__*` environment variables
//! (e.g. `GAME_EXPLORER__CATALOG__SEED=42`).

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::catalog::{GeneratorOptions, SaleModel};

/// Directory name used under the platform config/data roots.
pub const APP_DIR: &str = "game-explorer";
/// Name of the config file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";
/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GAME_EXPLORER";
/// Latency applied to the initial catalog load.
pub const DEFAULT_LOAD_DELAY_MS: u64 = 100;

const DEFAULT_CONFIG: &str = r#"# Game Explorer configuration.

# Where favorites and logs are stored. Defaults to the platform data dir.
# data_dir = "/home/me/.local/share/game-explorer"

[catalog]
# Fix the sale draws so they survive restarts. Remove for fresh draws each launch.
# seed = 42

# "coupled": a sale always carries a discount.
# "independent": sale flag and discount are drawn separately.
sale_model = "coupled"

# Simulated loading latency in milliseconds.
load_delay_ms = 100
"#;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the favorites store and logs.
    pub data_dir: PathBuf,
    /// Catalog generation settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Catalog generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Seed for sale draws; `None` draws fresh values every launch.
    #[serde(default)]
    pub seed: Option<u64>,
    /// How sale flag and discount relate.
    #[serde(default)]
    pub sale_model: SaleModel,
    /// Simulated loading latency.
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,
}

fn default_load_delay_ms() -> u64 {
    DEFAULT_LOAD_DELAY_MS
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sale_model: SaleModel::default(),
            load_delay_ms: DEFAULT_LOAD_DELAY_MS,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (optional) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("catalog.sale_model", "coupled")?
            .set_default("catalog.load_delay_ms", DEFAULT_LOAD_DELAY_MS as i64)?
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Generator options derived from the catalog section.
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            seed: self.catalog.seed,
            sale_model: self.catalog.sale_model,
            load_delay: Duration::from_millis(self.catalog.load_delay_ms),
        }
    }

    /// Directory for log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Default data directory under the platform data root.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Location of the user config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default config if none exists yet.
///
/// Returns the path when a file was written.
pub fn ensure_default_config() -> Result<Option<PathBuf>> {
    let path = config_path();
    let written = write_default_config(&path)?;
    Ok(written.then_some(path))
}

fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.catalog.sale_model, SaleModel::Coupled);
        assert_eq!(config.data_dir, default_data_dir());
        Ok(())
    }

    #[test]
    fn default_template_parses() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        assert!(write_default_config(&path)?);
        assert!(path.exists());
        assert!(!write_default_config(&path)?);

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.catalog.sale_model, SaleModel::Coupled);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"data_dir = "/tmp/explorer-data"

[catalog]
sale_model = "independent"
"#,
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.data_dir, PathBuf::from("/tmp/explorer-data"));
        assert_eq!(config.catalog.sale_model, SaleModel::Independent);
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/explorer-data/logs"));
        Ok(())
    }

    #[test]
    fn environment_overrides_seed() -> Result<()> {
        let dir = tempdir()?;
        std::env::set_var("GAME_EXPLORER__CATALOG__SEED", "77");
        let loaded = AppConfig::load_from(dir.path().join(CONFIG_FILE));
        std::env::remove_var("GAME_EXPLORER__CATALOG__SEED");

        let config = loaded?;
        assert_eq!(config.catalog.seed, Some(77));
        assert_eq!(config.generator_options().seed, Some(77));
        Ok(())
    }
}
