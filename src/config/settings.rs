//! TOML-based configuration of the Druid client.
//!
//! Example configuration:
//! ```toml
//! broker_url = "http://broker:8082"
//! coordinator_url = "http://coordinator:8081"
//! overlord_url = "http://overlord:8090"
//! retries = 2
//! retry_delay_ms = 500
//! timeout_secs = 60
//!
//! [auth]
//! username = "druid"
//! password = "${DRUID_PASSWORD}"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Broker base URL; queries are posted here.
    pub broker_url: String,

    /// Coordinator base URL; datasource and lookup management.
    pub coordinator_url: String,

    /// Overlord base URL; task submission and status.
    pub overlord_url: String,

    /// Extra attempts after a retriable failure.
    pub retries: u32,

    /// Pause between attempts, in milliseconds.
    pub retry_delay_ms: u64,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,

    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Pause between task status checks, in seconds.
    pub polling_sleep_secs: u64,

    /// Basic authentication, when the cluster requires it.
    pub auth: Option<AuthSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            broker_url: "http://localhost:8082".to_string(),
            coordinator_url: "http://localhost:8081".to_string(),
            overlord_url: "http://localhost:8090".to_string(),
            retries: 2,
            retry_delay_ms: 500,
            timeout_secs: 60,
            connect_timeout_secs: 10,
            polling_sleep_secs: 2,
            auth: None,
        }
    }
}

/// Basic authentication credentials.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthSettings {
    pub username: String,

    /// Supports ${ENV_VAR} expansion.
    pub password: String,
}

impl AuthSettings {
    /// Get the password with environment variables expanded.
    pub fn resolved_password(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.password)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text, expanding environment variables in URLs.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(content)?;
        settings.broker_url = expand_env_vars(&settings.broker_url)?;
        settings.coordinator_url = expand_env_vars(&settings.coordinator_url)?;
        settings.overlord_url = expand_env_vars(&settings.overlord_url)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations, then apply
    /// environment overrides.
    ///
    /// Searches in order:
    /// 1. Environment variable `DRUID_CONFIG`
    /// 2. `./druid.toml`
    /// 3. `~/.config/druid/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        let settings = if let Ok(path) = env::var("DRUID_CONFIG") {
            Self::from_file(&path)?
        } else if Path::new("druid.toml").exists() {
            Self::from_file("druid.toml")?
        } else {
            match dirs::config_dir().map(|dir| dir.join("druid").join("config.toml")) {
                Some(user_config) if user_config.exists() => Self::from_file(&user_config)?,
                _ => Settings::default(),
            }
        };
        settings.with_env_overrides()
    }

    /// Apply `DRUID_BROKER_URL`, `DRUID_COORDINATOR_URL`,
    /// `DRUID_OVERLORD_URL` and `DRUID_RETRIES`.
    pub fn with_env_overrides(mut self) -> Result<Self, SettingsError> {
        if let Ok(url) = env::var("DRUID_BROKER_URL") {
            self.broker_url = url;
        }
        if let Ok(url) = env::var("DRUID_COORDINATOR_URL") {
            self.coordinator_url = url;
        }
        if let Ok(url) = env::var("DRUID_OVERLORD_URL") {
            self.overlord_url = url;
        }
        if let Ok(retries) = env::var("DRUID_RETRIES") {
            self.retries = retries.trim().parse().map_err(|_| {
                SettingsError::InvalidConfig(format!("DRUID_RETRIES must be a number, got {:?}", retries))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for (name, url) in [
            ("broker_url", &self.broker_url),
            ("coordinator_url", &self.coordinator_url),
            ("overlord_url", &self.overlord_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(SettingsError::InvalidConfig(format!(
                    "{} must be an http(s) URL, got {:?}",
                    name, url
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn polling_sleep(&self) -> Duration {
        Duration::from_secs(self.polling_sleep_secs)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A `$` not followed by a name is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            let name: String = std::iter::from_fn(|| chars.next_if(|ch| *ch != '}')).collect();
            chars.next_if_eq(&'}');
            name
        } else {
            std::iter::from_fn(|| chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_')).collect()
        };

        if var_name.is_empty() {
            result.push('$');
            continue;
        }
        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
