//! Settings file management

use std::path::PathBuf;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::errors::WatchError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Watcher settings
///
/// Every field has a default, so an empty JSON object is a valid settings
/// file.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines on stdout
    #[serde(default)]
    pub log_json: bool,

    /// Directory for a rolling log file
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Polling interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Stop polling once the deployment has finished
    #[serde(default = "default_true")]
    pub stop_on_terminal: bool,
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    5000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_dir: None,
            backend: BackendSettings::default(),
            poll_interval_ms: default_poll_interval(),
            stop_on_terminal: true,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub async fn load(file: &File) -> Result<Self, WatchError> {
        file.read_json::<Settings>().await
    }
}

/// Backend API settings
#[derive(Debug, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the dashboard
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub auth_token: Option<SecretString>,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_timeout(),
            auth_token: None,
        }
    }
}
