//! End-to-end run tests

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use deploywatch::app::options::{AppOptions, ExportOptions};
use deploywatch::app::run::{run, run_with, RunSummary};
use deploywatch::http::client::HttpClient;
use deploywatch::models::deployment::DeploymentStatus;
use deploywatch::view::LogPanel;
use deploywatch::workers::poller::{self, StopReason};
use futures::future::pending;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

use crate::common::{target, Reply, ScriptedSource};
use crate::test_http::spawn_backend;

fn options(id: &str, in_progress: bool) -> AppOptions {
    AppOptions {
        target: target(id, in_progress),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_run_idle_when_not_in_progress() {
    let source = ScriptedSource::always(Reply::Snapshot("running", "x"));

    let summary = assert_ok!(
        run_with(options("5", false), source.clone(), LogPanel::new(false), pending()).await
    );

    assert!(matches!(summary, RunSummary::Idle));
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_run_reports_invalid_base_url_cause() {
    let options = AppOptions {
        backend_base_url: "not a url".to_string(),
        ..options("5", true)
    };

    let err = assert_err!(run(options, pending()).await);

    let message = err.to_string();
    assert!(message.contains("invalid backend URL 'not a url'"), "{}", message);
    assert!(message.contains("relative URL without a base"), "{}", message);
}

#[tokio::test(start_paused = true)]
async fn test_run_until_failure() {
    let source = ScriptedSource::new(
        vec![Reply::Snapshot("deploying", "step 1")],
        Reply::Snapshot("failed", "step 1\nboom"),
    );

    let summary = assert_ok!(
        run_with(options("5", true), source, LogPanel::new(true), pending()).await
    );

    assert!(summary.is_failure());
    match summary {
        RunSummary::Finished {
            deployment,
            final_status,
            requests,
            elapsed,
            stop_reason,
            saved_log,
        } => {
            assert_eq!(deployment.as_str(), "5");
            assert_eq!(final_status, Some(DeploymentStatus::Failed("failed".to_string())));
            assert_eq!(requests, 2);
            assert_eq!(elapsed, Duration::from_secs(10));
            assert_eq!(stop_reason, StopReason::Terminal);
            assert!(saved_log.is_none());
        }
        RunSummary::Idle => panic!("expected the poller to run"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_on_shutdown_signal() {
    let source = ScriptedSource::always(Reply::Snapshot("deploying", "still going"));

    let summary = assert_ok!(
        run_with(
            options("5", true),
            source.clone(),
            LogPanel::new(true),
            tokio::time::sleep(Duration::from_millis(12_000)),
        )
        .await
    );

    assert!(!summary.is_failure());
    match summary {
        RunSummary::Finished {
            final_status,
            requests,
            stop_reason,
            ..
        } => {
            assert!(final_status.is_none());
            assert_eq!(requests, 2);
            assert_eq!(stop_reason, StopReason::Cancelled);
        }
        RunSummary::Idle => panic!("expected the poller to run"),
    }

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_run_against_backend_and_save_log() {
    let hits = Arc::new(AtomicU64::new(0));
    let router = Router::new()
        .route(
            "/api/deployments/{id}/log/",
            get(|State(hits): State<Arc<AtomicU64>>| async move {
                let hit = hits.fetch_add(1, Ordering::SeqCst);
                let body: Value = if hit == 0 {
                    json!({"status": "deploying", "log": "Cloning repository..."})
                } else {
                    json!({"status": "running", "log": "Cloning repository...\nContainer started"})
                };
                Json(body)
            }),
        )
        .with_state(hits.clone());
    let base_url = spawn_backend(router).await;

    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join("deploy.log");

    let options = AppOptions {
        backend_base_url: base_url.clone(),
        target: target("8", true),
        poller: poller::Options {
            interval: Duration::from_millis(200),
            stop_on_terminal: true,
        },
        export: Some(ExportOptions {
            path: Some(export_path.clone()),
        }),
        ..Default::default()
    };
    let client = Arc::new(HttpClient::new(&base_url, Duration::from_secs(5)).unwrap());

    let summary = assert_ok!(run_with(options, client, LogPanel::new(true), pending()).await);

    match summary {
        RunSummary::Finished {
            final_status,
            requests,
            saved_log,
            ..
        } => {
            assert_eq!(final_status, Some(DeploymentStatus::Running));
            assert_eq!(requests, 2);
            assert_eq!(saved_log, Some(export_path.clone()));
        }
        RunSummary::Idle => panic!("expected the poller to run"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(
        std::fs::read_to_string(export_path).unwrap(),
        "Cloning repository...\nContainer started"
    );
}
