use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::time::Duration;
use thiserror::Error;

use crate::client::LocationContext;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Debug-level logging of partner client traffic
    #[serde(default)]
    pub enable_tracing: bool,
    /// PostgreSQL store; the in-memory store is used when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    #[serde(default)]
    pub partners: Vec<PartnerConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    /// Create tables and indexes at startup
    #[serde(default = "default_true")]
    pub init_schema: bool,
}

/// One money-transfer partner
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PartnerConfig {
    pub code: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Partner API root; `mock://` selects the in-process simulator
    pub base_url: String,
    /// Overrides `default_timeout_ms`
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Static branch/agent context sent with every call
    #[serde(default)]
    pub defaults: LocationContext,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_connections() -> u32 {
    20
}

fn default_acquire_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::from_file(&format!("config/{}.yaml", env))
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout_ms == 0 {
            return Err(ConfigError::Invalid("default_timeout_ms must be > 0".into()));
        }
        if let Some(db) = &self.database
            && db.url.trim().is_empty()
        {
            return Err(ConfigError::Invalid("database.url is empty".into()));
        }

        let mut seen = HashSet::new();
        for partner in &self.partners {
            let code = partner.code.trim().to_ascii_uppercase();
            if code.is_empty() {
                return Err(ConfigError::Invalid("partner code is empty".into()));
            }
            if !seen.insert(code.clone()) {
                return Err(ConfigError::Invalid(format!("partner {} listed twice", code)));
            }
            if partner.enabled && partner.base_url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("partner {} has no base_url", code)));
            }
            if partner.timeout_ms == Some(0) {
                return Err(ConfigError::Invalid(format!("partner {} timeout_ms must be > 0", code)));
            }
        }
        Ok(())
    }

    /// Effective per-call timeout for a partner
    pub fn partner_timeout(&self, partner: &PartnerConfig) -> Duration {
        Duration::from_millis(partner.timeout_ms.unwrap_or(self.default_timeout_ms))
    }
}
