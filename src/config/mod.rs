//! Configuration module for the Druid client.
//!
//! Handles endpoint URLs, retry policy, timeouts and credentials.

mod settings;

pub use settings::{expand_env_vars, AuthSettings, Settings, SettingsError};
