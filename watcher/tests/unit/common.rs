//! Shared test fixtures

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deploywatch::errors::WatchError;
use deploywatch::http::deployments::SnapshotSource;
use deploywatch::models::deployment::{
    DeploymentId, DeploymentSnapshot, DeploymentStatus, WatchTarget,
};

/// One scripted backend answer
#[derive(Debug, Clone)]
pub enum Reply {
    Snapshot(&'static str, &'static str),
    Delayed(Duration, &'static str, &'static str),
    Unavailable,
}

/// Snapshot source answering from a script, then repeating `fallback`
pub struct ScriptedSource {
    calls: AtomicU64,
    script: Vec<Reply>,
    fallback: Reply,
}

impl ScriptedSource {
    pub fn new(script: Vec<Reply>, fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU64::new(0),
            script,
            fallback,
        })
    }

    pub fn always(reply: Reply) -> Arc<Self> {
        Self::new(Vec::new(), reply)
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

fn snapshot(status: &str, log: &str) -> DeploymentSnapshot {
    DeploymentSnapshot {
        status: DeploymentStatus::from(status.to_string()),
        log: log.to_string(),
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch_snapshot(&self, _id: &DeploymentId) -> Result<DeploymentSnapshot, WatchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let reply = self.script.get(call).unwrap_or(&self.fallback).clone();

        match reply {
            Reply::Snapshot(status, log) => Ok(snapshot(status, log)),
            Reply::Delayed(delay, status, log) => {
                tokio::time::sleep(delay).await;
                Ok(snapshot(status, log))
            }
            Reply::Unavailable => Err(WatchError::BadStatus {
                status: 502,
                body: "bad gateway".to_string(),
            }),
        }
    }
}

pub fn target(id: &str, in_progress: bool) -> WatchTarget {
    WatchTarget::new(DeploymentId::parse(Some(id)), in_progress)
}
