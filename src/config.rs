//! Configuration module
//!
//! The console reads a TOML file (default `~/.config/biblioteca-admin/config.toml`).
//! Every section has defaults, so a partial file or no file at all is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::support::errors::InfraError;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub notifications: NotificationConfig,
    pub users: UsersConfig,
    pub dashboard: DashboardConfig,
    pub moderation: ModerationConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        Ok(toml::from_str(raw)?)
    }
}

/// Environment variable overriding the config location
pub const CONFIG_ENV: &str = "BIBLIOTECA_CONFIG";

/// Explicit path, then `BIBLIOTECA_CONFIG`, then [`default_config_path`]
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

/// Default config location: `~/.config/biblioteca-admin/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("biblioteca-admin")
        .join("config.toml")
}

/// Server the console talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the web application, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Value sent in the `X-CSRFToken` header
    pub csrf_token: String,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            csrf_token: String::new(),
            request_timeout_secs: 15,
        }
    }
}

/// Default banner durations, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub success_ms: u64,
    pub error_ms: u64,
    pub warning_ms: u64,
    pub info_ms: u64,
    /// Grace period between fade-out and detach
    pub fade_out_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            success_ms: 5000,
            error_ms: 7000,
            warning_ms: 6000,
            info_ms: 5000,
            fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersConfig {
    pub page_size: u32,
    pub search_debounce_ms: u64,
    /// Number of generated records loaded on mount
    pub sample_size: u32,
    /// Latency of the simulated user endpoints
    pub simulated_latency_ms: u64,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            search_debounce_ms: 500,
            sample_size: 50,
            simulated_latency_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub stats_refresh_secs: u64,
    pub counter_animation_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            stats_refresh_secs: 30,
            counter_animation_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub reload_delay_ms: u64,
    pub feedback_ms: u64,
    pub error_ms: u64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            reload_delay_ms: 1500,
            feedback_ms: 3000,
            error_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the local-storage file and downloaded exports
    pub dir: PathBuf,
}

impl StorageConfig {
    pub fn local_store_path(&self) -> PathBuf {
        self.dir.join("local-storage.json")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.dir.join("downloads")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: dirs_next::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("biblioteca-admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error
    pub level: String,
    /// `json` or `text`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
