//! Main application run loop

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::errors::WatchError;
use crate::http::client::HttpClient;
use crate::http::deployments::SnapshotSource;
use crate::models::deployment::{DeploymentId, DeploymentStatus};
use crate::storage::export::save_log;
use crate::utils::format_duration;
use crate::view::{StatusView, TerminalView};
use crate::workers::poller::{self, StopReason};

/// What a run amounted to
#[derive(Debug)]
pub enum RunSummary {
    /// Nothing to follow: no deployment id, or not in progress
    Idle,

    /// The poller ran and stopped
    Finished {
        deployment: DeploymentId,
        final_status: Option<DeploymentStatus>,
        requests: u64,
        elapsed: Duration,
        stop_reason: StopReason,
        saved_log: Option<PathBuf>,
    },
}

impl RunSummary {
    /// True when the last status seen was a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunSummary::Finished {
                final_status: Some(DeploymentStatus::Failed(_)),
                ..
            }
        )
    }
}

/// Follow the configured deployment on the backend, printing its log to
/// stdout
pub async fn run(
    mut options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<RunSummary, WatchError> {
    info!("Initializing deploywatch...");

    let mut http_client = HttpClient::new(&options.backend_base_url, options.request_timeout)
        .with_context(|| format!("invalid backend URL '{}'", options.backend_base_url))?;
    if let Some(token) = options.auth_token.take() {
        http_client = http_client.with_auth_token(token);
    }

    let view = TerminalView::new(std::io::stdout(), options.target.in_progress, options.color);

    run_with(options, Arc::new(http_client), view, shutdown_signal).await
}

/// Follow the configured deployment with the given snapshot source and view
pub async fn run_with<S, V>(
    options: AppOptions,
    source: Arc<S>,
    view: V,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<RunSummary, WatchError>
where
    S: SnapshotSource + 'static,
    V: StatusView + 'static,
{
    let Some(handle) = poller::start(options.poller.clone(), &options.target, source, view) else {
        return Ok(RunSummary::Idle);
    };
    let deployment = handle.deployment().clone();

    let report = handle.wait_until(shutdown_signal).await?;

    match &report.final_status {
        Some(status) => info!(
            "Deployment {} is {} (watched for {}, {} requests)",
            deployment,
            status,
            format_duration(report.elapsed),
            report.requests
        ),
        None => info!(
            "Stopped following deployment {} after {} ({} requests)",
            deployment,
            format_duration(report.elapsed),
            report.requests
        ),
    }

    let saved_log = match &options.export {
        Some(export) => match save_log(&deployment, report.view.content(), export.path.clone()).await {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Failed to save log of deployment {}: {}", deployment, e);
                None
            }
        },
        None => None,
    };

    Ok(RunSummary::Finished {
        deployment,
        final_status: report.final_status,
        requests: report.requests,
        elapsed: report.elapsed,
        stop_reason: report.stop_reason,
        saved_log,
    })
}
