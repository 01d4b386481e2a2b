//! Server configuration loaded from an optional TOML file and the environment

use anyhow::{bail, Context, Result};
use quotes_core::StoreConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default prefix for the quote routes
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default config file, read only when it exists
pub const DEFAULT_CONFIG_FILE: &str = "quotes.toml";

/// Top-level server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_address: String,

    /// Path prefix for the quote routes
    pub api_prefix: String,

    /// JSON data file; `None` keeps quotes in memory
    pub data_file: Option<PathBuf>,

    /// Export traces over OTLP
    pub otel_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            data_file: None,
            otel_enabled: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from disk and environment.
    ///
    /// The file named by `QUOTES_CONFIG` (default `quotes.toml`) is read when
    /// present; environment variables override it.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var("QUOTES_CONFIG").ok();
        let path = PathBuf::from(explicit.as_deref().unwrap_or(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if explicit.is_some() {
            bail!("config file {} does not exist", path.display());
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse TOML config text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BIND_ADDRESS") {
            self.bind_address = addr;
        }
        if let Some(prefix) = lookup("QUOTES_API_PREFIX") {
            self.api_prefix = prefix;
        }
        if let Some(path) = lookup("QUOTES_DATA_FILE") {
            self.data_file = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(flag) = lookup("OTEL_ENABLED") {
            self.otel_enabled = flag
                .parse::<bool>()
                .with_context(|| format!("invalid OTEL_ENABLED value {:?}", flag))?;
        }
        Ok(())
    }

    /// Check invariants the server relies on
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            bail!("api_prefix must start with '/', got {:?}", self.api_prefix);
        }
        if self.api_prefix.len() > 1 && self.api_prefix.ends_with('/') {
            bail!("api_prefix must not end with '/', got {:?}", self.api_prefix);
        }
        Ok(())
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("invalid bind address {:?}", self.bind_address))
    }

    /// Store backend this configuration selects
    pub fn store_config(&self) -> StoreConfig {
        match &self.data_file {
            Some(path) => StoreConfig::JsonFile { path: path.clone() },
            None => StoreConfig::Memory,
        }
    }
}
