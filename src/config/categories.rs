//! Default category configuration loading from config.toml
//!
//! The categories listed under `[[categories]]` are the shared defaults every
//! user can see. They are inserted on startup by
//! [`crate::core::category::seed_default_categories`] when missing.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Location used when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Default categories to seed
    #[serde(default)]
    pub categories: Vec<DefaultCategoryConfig>,
}

/// Configuration for a single default category
#[derive(Debug, Deserialize, Clone)]
pub struct DefaultCategoryConfig {
    /// Display name, unique among defaults
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional icon identifier or emoji
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional `#RRGGBB` color
    #[serde(default)]
    pub color: Option<String>,
}

/// Loads category configuration from a TOML file
///
/// # Errors
/// Returns [`Error::Config`] if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads category configuration from `CONFIG_PATH`, or `./config.toml`
pub fn load_default_config() -> Result<Config> {
    let path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}
