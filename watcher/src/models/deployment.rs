//! Deployment models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the deployment being watched
///
/// Opaque to the client; it is only ever interpolated into the log
/// endpoint path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentId(String);

impl DeploymentId {
    /// Build an identifier from host-supplied configuration.
    ///
    /// Returns `None` for a missing, empty or whitespace-only value. Any
    /// other value is kept as given.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deployment the host asks to follow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchTarget {
    /// Deployment identifier, if the host knows one
    pub deployment_id: Option<DeploymentId>,

    /// Whether the host believes the deployment is still running
    pub in_progress: bool,
}

impl WatchTarget {
    pub fn new(deployment_id: Option<DeploymentId>, in_progress: bool) -> Self {
        Self {
            deployment_id,
            in_progress,
        }
    }

    /// The deployment to poll, if polling should happen at all
    pub fn active_deployment(&self) -> Option<&DeploymentId> {
        if self.in_progress {
            self.deployment_id.as_ref()
        } else {
            None
        }
    }
}

/// Deployment status as reported by the backend
///
/// Only `deploying` is non-terminal. Any status other than `deploying` or
/// `running` is treated as a failure and keeps its raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentStatus {
    Deploying,
    Running,
    Failed(String),
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::Deploying => "deploying",
            DeploymentStatus::Running => "running",
            DeploymentStatus::Failed(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeploymentStatus::Deploying)
    }

    /// Badge to show once this status is reached, if it is terminal
    pub fn badge(&self) -> Option<Badge> {
        match self {
            DeploymentStatus::Deploying => None,
            DeploymentStatus::Running => Some(Badge::running()),
            DeploymentStatus::Failed(_) => Some(Badge::failed()),
        }
    }
}

impl From<String> for DeploymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "deploying" => DeploymentStatus::Deploying,
            "running" => DeploymentStatus::Running,
            _ => DeploymentStatus::Failed(raw),
        }
    }
}

impl From<DeploymentStatus> for String {
    fn from(status: DeploymentStatus) -> Self {
        match status {
            DeploymentStatus::Failed(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest state of a deployment, as served by the log endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSnapshot {
    /// Current status
    pub status: DeploymentStatus,

    /// Full log text so far
    #[serde(default)]
    pub log: String,
}

/// Visual style of the status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Success,
    Danger,
}

/// Status badge shown next to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub style: BadgeStyle,
    pub text: &'static str,
}

impl Badge {
    pub fn running() -> Self {
        Self {
            style: BadgeStyle::Success,
            text: "Running",
        }
    }

    pub fn failed() -> Self {
        Self {
            style: BadgeStyle::Danger,
            text: "Failed",
        }
    }
}
