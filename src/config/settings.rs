//! Persistence of [`AppConfig`] as pretty-printed JSON.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "Sift";
const CONFIG_FILE: &str = "config.json";

/// The per-user directory holding `config.json`, if the platform has one.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "sift", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn get_config_file_path() -> Option<PathBuf> {
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

fn default_config_path() -> Result<PathBuf> {
    get_config_file_path().context("No per-user config directory on this platform")
}

/// Loads the per-user configuration. See [`load_config_from`].
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&default_config_path()?)
}

/// Loads a configuration from `config_path`.
///
/// A missing file is created with defaults. A file that cannot be parsed is
/// left untouched; a warning is logged and the defaults are used instead.
pub fn load_config_from(config_path: &Path) -> Result<AppConfig> {
    if !config_path.exists() {
        tracing::info!("No config at {:?}, writing defaults", config_path);
        let config = AppConfig::default();
        save_config(&config, Some(config_path))?;
        return Ok(config);
    }

    match read_json(config_path) {
        Ok(config) => {
            tracing::debug!("Config loaded from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable config {:?}, using defaults: {:#}", config_path, e);
            Ok(AppConfig::default())
        }
    }
}

/// Writes `config` to `config_path`, or to the per-user config file when `None`.
pub fn save_config(config: &AppConfig, config_path: Option<&Path>) -> Result<()> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create config directory {:?}", parent))?;
    }
    write_json(config, &config_path)?;
    tracing::debug!("Config saved to {:?}", config_path);
    Ok(())
}

/// Writes `config` to an arbitrary file, e.g. to share it between machines.
pub fn export_config(config: &AppConfig, export_path: &Path) -> Result<()> {
    write_json(config, export_path)?;
    tracing::info!("Config exported to {:?}", export_path);
    Ok(())
}

/// Reads a config written by [`export_config`]. Unlike [`load_config_from`],
/// a malformed file is an error.
pub fn import_config(import_path: &Path) -> Result<AppConfig> {
    let config = read_json(import_path)?;
    tracing::info!("Config imported from {:?}", import_path);
    Ok(config)
}

fn read_json(path: &Path) -> Result<AppConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("Cannot read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config in {:?}", path))
}

fn write_json(config: &AppConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).with_context(|| format!("Cannot write {:?}", path))
}
