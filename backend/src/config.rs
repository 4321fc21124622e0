//! Server configuration.
//!
//! Read from the YAML file named by `BOOKING_CONFIG` (every field optional),
//! then adjusted by `BOOKING_BIND_ADDR` and `BOOKING_SUBMISSION_ENDPOINT`.
//! A missing file means defaults.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "BOOKING_CONFIG";
pub const BIND_ADDR_ENV: &str = "BOOKING_BIND_ADDR";
pub const SUBMISSION_ENDPOINT_ENV: &str = "BOOKING_SUBMISSION_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub server: ServerConfig,
    /// YAML catalog to load instead of the built-in one
    pub catalog_path: Option<PathBuf>,
    pub submission: SubmissionConfig,
    pub sessions: SessionConfig,
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub log_filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub cors_origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Remote endpoint; the simulated service is used when unset
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    pub simulated_latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions untouched for this long are dropped
    pub idle_ttl_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            catalog_path: None,
            submission: SubmissionConfig::default(),
            sessions: SessionConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
            simulated_latency_ms: 2000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { idle_ttl_secs: 1800 }
    }
}

impl SessionConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }
}

impl SubmissionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl BookingConfig {
    /// Load using the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load with an explicit variable lookup
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                debug!("{} not set, using default configuration", CONFIG_PATH_ENV);
                Self::default()
            }
        };
        config.apply_overrides(lookup);
        Ok(config)
    }

    /// Parse a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).context("Invalid booking configuration")
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_addr) = lookup(BIND_ADDR_ENV) {
            debug!("Overriding bind address from {}", BIND_ADDR_ENV);
            self.server.bind_addr = bind_addr;
        }
        if let Some(endpoint) = lookup(SUBMISSION_ENDPOINT_ENV) {
            debug!("Overriding submission endpoint from {}", SUBMISSION_ENDPOINT_ENV);
            self.submission.endpoint = Some(endpoint).filter(|value| !value.trim().is_empty());
        }
    }
}
