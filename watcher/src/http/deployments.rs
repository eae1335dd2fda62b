//! Deployment API client

use async_trait::async_trait;

use crate::errors::WatchError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeploymentId, DeploymentSnapshot};

/// Source of deployment snapshots for the poller
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the latest status and full log of a deployment
    async fn fetch_snapshot(&self, id: &DeploymentId) -> Result<DeploymentSnapshot, WatchError>;
}

impl HttpClient {
    /// Get the latest status and log of a deployment
    pub async fn get_deployment_log(
        &self,
        id: &DeploymentId,
    ) -> Result<DeploymentSnapshot, WatchError> {
        let url = self.endpoint(&["api", "deployments", id.as_str(), "log", ""])?;
        self.get(url).await
    }
}

#[async_trait]
impl SnapshotSource for HttpClient {
    async fn fetch_snapshot(&self, id: &DeploymentId) -> Result<DeploymentSnapshot, WatchError> {
        self.get_deployment_log(id).await
    }
}
