//! Configuration management for Spotter-Oxide

use crate::{Error, Result};
use serde::Deserialize;
use std::env;

/// Session configuration
///
/// Recognized at session construction; controls whether resolved elements
/// are memoized and which tags/attributes the cache admits.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Enable the per-session element cache
    pub cache_enabled: bool,

    /// Tags admitted to the cache; empty admits every tag not excluded
    pub cache_include_tags: Vec<String>,

    /// Tags never admitted to the cache
    pub cache_exclude_tags: Vec<String>,

    /// Attribute names admitted to the cache; empty admits every name not
    /// excluded
    pub cache_include_attributes: Vec<String>,

    /// Attribute names never admitted to the cache
    pub cache_exclude_attributes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_include_tags: Vec::new(),
            cache_exclude_tags: Vec::new(),
            cache_include_attributes: Vec::new(),
            cache_exclude_attributes: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(enabled) = env::var("SPOTTER_CACHE_ENABLED") {
            config.cache_enabled = enabled
                .parse()
                .map_err(|_| Error::configuration("Invalid SPOTTER_CACHE_ENABLED"))?;
        }

        if let Ok(tags) = env::var("SPOTTER_CACHE_INCLUDE_TAGS") {
            config.cache_include_tags = split_list(&tags);
        }

        if let Ok(tags) = env::var("SPOTTER_CACHE_EXCLUDE_TAGS") {
            config.cache_exclude_tags = split_list(&tags);
        }

        if let Ok(attrs) = env::var("SPOTTER_CACHE_INCLUDE_ATTRIBUTES") {
            config.cache_include_attributes = split_list(&attrs);
        }

        if let Ok(attrs) = env::var("SPOTTER_CACHE_EXCLUDE_ATTRIBUTES") {
            config.cache_exclude_attributes = split_list(&attrs);
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }
}

/// Split a comma-separated list, dropping empty entries
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
