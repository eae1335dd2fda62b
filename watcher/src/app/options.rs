//! Application configuration options

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::errors::WatchError;
use crate::logs::{LogLevel, LogOptions};
use crate::models::deployment::{DeploymentId, WatchTarget};
use crate::storage::settings::Settings;
use crate::workers::poller;

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    /// Dashboard base URL
    pub backend_base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Bearer token for the backend
    pub auth_token: Option<SecretString>,

    /// Deployment to follow
    pub target: WatchTarget,

    /// Poller worker options
    pub poller: poller::Options,

    /// Save the final log once polling ends
    pub export: Option<ExportOptions>,

    /// Colorize the status badge
    pub color: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(30),
            auth_token: None,
            target: WatchTarget::default(),
            poller: poller::Options::default(),
            export: None,
            color: true,
        }
    }
}

/// Log export options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Target file; `deployment-{id}-logs.txt` in the working directory
    /// when unset
    pub path: Option<PathBuf>,
}

impl AppOptions {
    /// Build options from the settings file, with command line flags taking
    /// precedence
    pub fn from_settings(
        settings: Settings,
        cli_args: &HashMap<String, String>,
    ) -> Result<Self, WatchError> {
        let interval_ms = match cli_args.get("interval-ms") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| WatchError::ConfigError(format!("invalid --interval-ms '{}': {}", raw, e)))?,
            None => settings.poll_interval_ms,
        };
        if interval_ms == 0 {
            return Err(WatchError::ConfigError("polling interval must be positive".to_string()));
        }

        let in_progress = flag(cli_args, "in-progress")?;
        let stop_on_terminal = settings.stop_on_terminal && !flag(cli_args, "keep-polling")?;
        let color = !flag(cli_args, "no-color")?;

        let export = cli_args.get("save-log").map(|raw| ExportOptions {
            path: (raw != "true").then(|| PathBuf::from(raw)),
        });

        Ok(Self {
            backend_base_url: cli_args
                .get("base-url")
                .cloned()
                .unwrap_or(settings.backend.base_url),
            request_timeout: Duration::from_secs(settings.backend.timeout_secs),
            auth_token: settings.backend.auth_token,
            target: WatchTarget::new(
                DeploymentId::parse(cli_args.get("deployment").map(String::as_str)),
                in_progress,
            ),
            poller: poller::Options {
                interval: Duration::from_millis(interval_ms),
                stop_on_terminal,
            },
            export,
            color,
        })
    }
}

/// Logging options from the settings file and command line
pub fn log_options(
    settings: &Settings,
    cli_args: &HashMap<String, String>,
) -> Result<LogOptions, WatchError> {
    let log_level = match cli_args.get("log-level") {
        Some(raw) => raw.parse::<LogLevel>().map_err(WatchError::ConfigError)?,
        None => settings.log_level,
    };

    Ok(LogOptions {
        log_level,
        json_format: settings.log_json || flag(cli_args, "log-json")?,
        log_dir: settings.log_dir.clone(),
        ..Default::default()
    })
}

/// Boolean flag; absent means false, a bare `--name` arrives as "true"
fn flag(cli_args: &HashMap<String, String>, name: &str) -> Result<bool, WatchError> {
    let Some(raw) = cli_args.get(name) else {
        return Ok(false);
    };
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(WatchError::ConfigError(format!("invalid --{} '{}'", name, raw))),
    }
}
