//! Deployment status poller
//!
//! Fetches a deployment's snapshot on a fixed cadence and renders it into a
//! [`StatusView`] until the deployment reaches a terminal status or the
//! poller is cancelled. Every tick sends its request independently of the
//! previous one; responses are applied in send order and a response older
//! than the last rendered one is dropped.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::errors::WatchError;
use crate::http::deployments::SnapshotSource;
use crate::models::deployment::{DeploymentId, DeploymentSnapshot, DeploymentStatus, WatchTarget};
use crate::view::StatusView;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Time between two requests; the first request is sent one interval
    /// after start
    pub interval: Duration,

    /// Stop once a terminal status has been rendered
    pub stop_on_terminal: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
            stop_on_terminal: true,
        }
    }
}

/// Why the poller stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A terminal status was rendered
    Terminal,
    /// The shutdown signal fired
    Cancelled,
}

/// Outcome of a poll session
#[derive(Debug)]
pub struct PollReport<V> {
    /// The view, as last rendered
    pub view: V,

    /// Status of the last rendered snapshot, if it was terminal
    pub final_status: Option<DeploymentStatus>,

    /// Number of requests sent
    pub requests: u64,

    /// Time from start until the poller stopped
    pub elapsed: Duration,

    pub stop_reason: StopReason,
}

/// Handle on a running poller
///
/// Dropping the handle stops the poller at its next scheduling point.
pub struct PollHandle<V> {
    deployment: DeploymentId,
    cancel_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<PollReport<V>>,
}

impl<V> PollHandle<V> {
    /// Ask the poller to stop; in-flight requests are abandoned
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Deployment being followed
    pub fn deployment(&self) -> &DeploymentId {
        &self.deployment
    }

    /// Wait for the poller to stop on its own
    pub async fn wait(self) -> Result<PollReport<V>, WatchError> {
        let PollHandle { cancel_tx, task, .. } = self;
        let report = task
            .await
            .map_err(|e| WatchError::ShutdownError(e.to_string()));
        drop(cancel_tx);
        report
    }

    /// Wait for the poller to stop on its own, or cancel it once `signal`
    /// resolves first
    pub async fn wait_until<F>(self, signal: F) -> Result<PollReport<V>, WatchError>
    where
        F: Future<Output = ()>,
    {
        let PollHandle {
            cancel_tx,
            mut task,
            ..
        } = self;

        tokio::select! {
            joined = &mut task => {
                return joined.map_err(|e| WatchError::ShutdownError(e.to_string()));
            }
            _ = signal => {
                info!("Stopping poller...");
            }
        }

        if let Some(tx) = cancel_tx {
            let _ = tx.send(());
        }
        task.await.map_err(|e| WatchError::ShutdownError(e.to_string()))
    }

    /// Cancel the poller and wait for it to stop
    pub async fn shutdown(mut self) -> Result<PollReport<V>, WatchError> {
        self.cancel();
        self.wait().await
    }
}

/// Start polling the target deployment.
///
/// Returns `None` without sending any request when the target has no
/// deployment id or is not flagged as in progress.
pub fn start<S, V>(
    options: Options,
    target: &WatchTarget,
    source: Arc<S>,
    view: V,
) -> Option<PollHandle<V>>
where
    S: SnapshotSource + 'static,
    V: StatusView + 'static,
{
    let Some(id) = target.active_deployment() else {
        debug!("No deployment in progress, poller not started");
        return None;
    };

    let deployment = id.clone();
    let id = deployment.clone();
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        run(
            &options,
            id,
            source,
            view,
            async move {
                let _ = cancel_rx.await;
            }
            .boxed(),
        )
        .await
    });

    Some(PollHandle {
        deployment,
        cancel_tx: Some(cancel_tx),
        task,
    })
}

type TickResult = (u64, Result<DeploymentSnapshot, WatchError>);

/// Run the poller until a terminal status (when configured) or shutdown
pub async fn run<S, V>(
    options: &Options,
    id: DeploymentId,
    source: Arc<S>,
    mut view: V,
    mut shutdown_signal: BoxFuture<'static, ()>,
) -> PollReport<V>
where
    S: SnapshotSource + 'static,
    V: StatusView,
{
    info!(
        "Poller starting for deployment {} (every {:?})",
        id, options.interval
    );

    let started_at = Instant::now();
    let mut ticker = tokio::time::interval_at(started_at + options.interval, options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut in_flight: JoinSet<TickResult> = JoinSet::new();
    let mut requests: u64 = 0;
    let mut last_rendered: Option<u64> = None;
    let mut final_status = None;

    let stop_reason = loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller for deployment {} shutting down...", id);
                break StopReason::Cancelled;
            }
            _ = ticker.tick() => {
                requests += 1;
                let seq = requests;
                let source = source.clone();
                let id = id.clone();
                debug!("Polling deployment {} (request #{})", id, seq);
                in_flight.spawn(async move {
                    let result = source.fetch_snapshot(&id).await;
                    (seq, result)
                });
            }
            Some(joined) = in_flight.join_next() => {
                let (seq, result) = match joined {
                    Ok(tick) => tick,
                    Err(e) => {
                        error!("Poll request task failed: {}", e);
                        continue;
                    }
                };

                let snapshot = match result {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        error!("Failed to fetch log of deployment {}: {}", id, e);
                        continue;
                    }
                };

                if last_rendered.is_some_and(|last| seq < last) {
                    debug!("Dropping stale response #{} for deployment {}", seq, id);
                    continue;
                }
                last_rendered = Some(seq);

                view.render(&snapshot);
                debug!("Deployment {} is {}", id, snapshot.status);

                if snapshot.status.is_terminal() {
                    final_status = Some(snapshot.status);
                    if options.stop_on_terminal {
                        info!("Deployment {} finished, poller stopping", id);
                        break StopReason::Terminal;
                    }
                } else {
                    final_status = None;
                }
            }
        }
    };

    in_flight.abort_all();

    PollReport {
        view,
        final_status,
        requests,
        elapsed: started_at.elapsed(),
        stop_reason,
    }
}
