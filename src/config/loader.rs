//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/testilens/config.toml)
//! 3. Project config (./testilens.toml)
//! 4. Environment variables (TESTILENS_* prefix)
//!
//! The model credential is deliberately outside this chain: it travels
//! only through the `GEMINI_API_KEY` environment variable and is picked
//! up by the gateway itself.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use super::types::Config;
use crate::types::{InsightError, Result};

/// Header prepended to the generated default config file
const CONFIG_HEADER: &str = "\
# testilens configuration
#
# Values here are merged over built-in defaults and overridden by
# TESTILENS_* environment variables (e.g. TESTILENS_GATEWAY_MODEL).
# The Gemini credential is read from the GEMINI_API_KEY environment
# variable, never from this file.
";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Merge global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        // Merge project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // Merge environment variables (e.g. TESTILENS_GATEWAY_MODEL -> gateway.model)
        figment = figment.merge(Env::prefixed("TESTILENS_").split('_').lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| InsightError::Config(format!("configuration error: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file over the defaults
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| InsightError::Config(format!("configuration error: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory (~/.config/testilens on Linux)
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "testilens").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Path to the project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("testilens.toml")
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a commented default config into the working directory
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let path = Self::project_config_path();
        Self::write_default(&path, force)?;
        Ok(path)
    }

    /// Write the default config file to an explicit path
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(InsightError::Config(format!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            )));
        }

        fs::write(path, Self::default_config_toml()?)?;
        info!("Created config: {}", path.display());
        Ok(())
    }

    /// Render the built-in defaults as commented TOML
    fn default_config_toml() -> Result<String> {
        let body = toml::to_string_pretty(&Config::default())
            .map_err(|e| InsightError::Config(format!("failed to render default config: {e}")))?;
        Ok(format!("{CONFIG_HEADER}\n{body}"))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_default_config() {
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_load_from_file_merges_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testilens.toml");
        fs::write(&path, "[gateway]\nmodel = \"gemini-2.0-flash\"\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.gateway.model, "gemini-2.0-flash");
        assert_eq!(config.gateway.timeout_secs, 300);
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testilens.toml");
        fs::write(&path, "[gateway]\ntimeout_secs = 0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_write_default_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testilens.toml");

        ConfigLoader::write_default(&path, false).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# testilens configuration"));

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.gateway.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_write_default_respects_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testilens.toml");

        ConfigLoader::write_default(&path, false).unwrap();
        let err = ConfigLoader::write_default(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        assert!(ConfigLoader::write_default(&path, true).is_ok());
    }

    #[test]
    fn test_env_override() {
        // SAFETY: no other test reads this variable
        unsafe {
            std::env::set_var("TESTILENS_GATEWAY_MODEL", "env-model");
        }
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.gateway.model, "env-model");
        unsafe {
            std::env::remove_var("TESTILENS_GATEWAY_MODEL");
        }
    }
}
