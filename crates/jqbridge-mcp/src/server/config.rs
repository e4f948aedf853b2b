//! Configuration for the jqbridge MCP server.
//!
//! Configuration is loaded from `~/.config/jqbridge/mcp-server.toml`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use jqbridge_core::JqExecutor;
use serde::{Deserialize, Serialize};

/// Configuration for the jqbridge MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name (shown to MCP clients).
    #[serde(default = "default_name")]
    pub name: String,

    /// Server version.
    #[serde(default = "default_version")]
    pub version: String,

    /// jq binary name or path. Resolved from the search path per call.
    #[serde(default = "default_jq_bin")]
    pub jq_bin: String,

    /// Deadline for a single jq invocation in milliseconds.
    ///
    /// Absent means wait indefinitely, matching the reference behavior;
    /// set it to bound hung invocations.
    #[serde(default)]
    pub default_timeout_ms: Option<u64>,
}

fn default_name() -> String {
    "jqbridge".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_jq_bin() -> String {
    "jq".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            jq_bin: default_jq_bin(),
            default_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the default config file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs =
            ProjectDirs::from("", "", "jqbridge").context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("mcp-server.toml"))
    }

    /// Build the executor this configuration describes.
    pub fn executor(&self) -> JqExecutor {
        let executor = JqExecutor::new().with_binary(&self.jq_bin);
        match self.default_timeout_ms {
            Some(ms) => executor.with_timeout(Duration::from_millis(ms)),
            None => executor,
        }
    }
}
