//! Main application configuration
//!
//! This module defines the primary configuration structures for the game-night
//! service, including environment variable and TOML file loading and validation.

use crate::error::GameNightError;
use crate::teams::{MAX_TEAMS, MIN_TEAMS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub store: StoreSettings,
    pub teams: TeamSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Address the HTTP server binds to
    pub http_host: String,
    /// Port for the HTTP API, health and metrics endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Score store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// JSON file backing the store; in-memory when unset
    pub data_file: Option<PathBuf>,
    /// Pretty-print the JSON snapshot
    pub pretty: bool,
}

/// Team generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSettings {
    /// Team count used when a request does not name one
    pub default_team_count: usize,
    /// Prefix of team labels ("Team" gives "Team 1", "Team 2", ...)
    pub label_prefix: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "game-night".to_string(),
            log_level: "info".to_string(),
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self {
            default_team_count: 2,
            label_prefix: "Team".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(host) = env::var("HTTP_HOST") {
            self.service.http_host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            self.service.http_port = port
                .parse()
                .map_err(|_| config_error(format!("Invalid HTTP_PORT value: {}", port)))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| {
                    config_error(format!(
                        "Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}",
                        timeout
                    ))
                })?;
        }

        // Store settings
        if let Ok(data_file) = env::var("DATA_FILE") {
            self.store.data_file = if data_file.is_empty() {
                None
            } else {
                Some(PathBuf::from(data_file))
            };
        }

        // Team settings
        if let Ok(count) = env::var("DEFAULT_TEAM_COUNT") {
            self.teams.default_team_count = count
                .parse()
                .map_err(|_| config_error(format!("Invalid DEFAULT_TEAM_COUNT value: {}", count)))?;
        }
        if let Ok(prefix) = env::var("TEAM_LABEL_PREFIX") {
            self.teams.label_prefix = prefix;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Address string for the HTTP listener
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.service.http_host, self.service.http_port)
    }
}

fn config_error(message: impl Into<String>) -> anyhow::Error {
    GameNightError::ConfigurationError {
        message: message.into(),
    }
    .into()
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(config_error(format!(
                "Invalid log level: {}",
                config.service.log_level
            )))
        }
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(config_error("HTTP port cannot be 0"));
    }
    if config.service.http_host.is_empty() {
        return Err(config_error("HTTP host cannot be empty"));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(config_error("Shutdown timeout must be greater than 0"));
    }

    // Validate team settings
    if !(MIN_TEAMS..=MAX_TEAMS).contains(&config.teams.default_team_count) {
        return Err(config_error(format!(
            "Default team count must be between {} and {}",
            MIN_TEAMS, MAX_TEAMS
        )));
    }
    if config.teams.label_prefix.trim().is_empty() {
        return Err(config_error("Team label prefix cannot be empty"));
    }

    Ok(())
}
