//! Configuration module
//!
//! Application settings are read from a TOML file, by default
//! `~/.config/lorepic-credits/config.toml`. Every section and field is
//! optional; anything missing falls back to its default.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::BillingMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the effective configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    /// No file at the given path
    Defaults,
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lorepic-credits")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub billing: BillingConfig,
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight work on shutdown
    pub shutdown_timeout: u64,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Full connection URL; takes precedence over `sqlite.path`
    pub url: Option<String>,
    pub sqlite: SqliteSettings,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            sqlite: SqliteSettings::default(),
            max_connections: 5,
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", self.sqlite.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteSettings {
    pub path: String,
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            path: "lorepic.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. `info` or `lorepic_credits=debug,info`
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiration_hours: i64,
    /// Token roles allowed to change billing settings
    pub privileged_roles: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_issuer: "lorepic".to_string(),
            jwt_expiration_hours: 24,
            privileged_roles: vec!["admin".to_string()],
        }
    }
}

impl SecurityConfig {
    /// Still signing with the shipped placeholder secret.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn privileged_role_set(&self) -> HashSet<String> {
        self.privileged_roles.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Used when no mode has been persisted yet
    pub default_mode: BillingMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Seconds between background reloads of the pricing rules; 0 disables
    pub refresh_interval_secs: u64,
}

impl AppConfig {
    /// Read and validate the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig = toml::from_str(&raw)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Startup variant of [`load`](Self::load): only a missing file falls
    /// back to (validated) defaults. A file that is present but unreadable,
    /// malformed or invalid is an error.
    pub fn load_or_default(path: &Path) -> Result<(Self, ConfigOrigin), ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok((config, ConfigOrigin::File)),
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                let mut config = Self::default();
                config.apply_overrides(|key| std::env::var(key).ok());
                config.validate()?;
                Ok((config, ConfigOrigin::Defaults))
            }
            Err(e) => Err(e),
        }
    }

    /// Secrets may come from the environment instead of the file.
    ///
    /// Recognised: `LOREPIC_JWT_SECRET`, `DATABASE_URL`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = lookup("LOREPIC_JWT_SECRET").filter(|s| !s.is_empty()) {
            self.security.jwt_secret = secret;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            self.database.url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.api_port == 0 {
            return Err(ConfigError::Invalid("server.api_port must not be 0".into()));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret must not be empty".into()));
        }
        if self.security.jwt_expiration_hours <= 0 {
            return Err(ConfigError::Invalid(
                "security.jwt_expiration_hours must be positive".into(),
            ));
        }
        if self.security.privileged_roles.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "security.privileged_roles must not contain empty roles".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
