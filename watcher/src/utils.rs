//! Utility functions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Version information for the watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Format a duration as `"{minutes}m {seconds}s"`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}m {}s", total / 60, total % 60)
}
