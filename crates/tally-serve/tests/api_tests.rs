use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{SecondsFormat, TimeDelta, Utc};
use serde_json::{Value, json};
use std::fs;
use tally_core::LoadOptions;
use tally_serve::{AppState, app};
use tempfile::TempDir;
use tower::ServiceExt;

struct Harness {
    _dir: TempDir,
    state: AppState,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let raw_dir = dir.path().join("raw");
        fs::create_dir_all(&raw_dir).unwrap();
        let state = AppState::new(
            dir.path().join("tally.db"),
            LoadOptions {
                raw_dir,
                views_script: None,
            },
        );
        Self { _dir: dir, state }
    }

    fn write_batch(&self, name: &str, records: &[Value]) {
        let body: Vec<String> = records.iter().map(Value::to_string).collect();
        fs::write(self.state.load_options.raw_dir.join(name), body.join("\n")).unwrap();
    }

    async fn send(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

fn recent(minutes_ago: i64) -> String {
    (Utc::now() - TimeDelta::minutes(minutes_ago)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn event(id: &str, kind: &str, login: &str, repo: &str, minutes_ago: i64) -> Value {
    json!({
        "id": id,
        "type": kind,
        "created_at": recent(minutes_ago),
        "actor": {"id": 7, "login": login},
        "repo": {"id": 42, "name": repo},
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let harness = Harness::new();
    let (status, body) = harness.send("GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn load_returns_summary_and_is_idempotent() {
    let harness = Harness::new();
    harness.write_batch(
        "2026-02-03-10.jsonl",
        &[
            event("e1", "PushEvent", "alice", "org/app", 50),
            event("e2", "PushEvent", "alice", "org/app", 40),
            event("e3", "IssuesEvent", "bob", "org/lib", 30),
        ],
    );

    let (status, first) = harness.send("POST", "/load").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["scanned_files"], 1);
    assert_eq!(first["loaded_files"], 1);
    assert_eq!(first["inserted_events"], 3);
    assert_eq!(first["failed_files"], 0);

    let (status, second) = harness.send("POST", "/load").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["loaded_files"], 0);
    assert_eq!(second["skipped_files"], 1);
    assert_eq!(second["inserted_events"], 0);
}

#[tokio::test]
async fn analytics_endpoints_return_loaded_activity() {
    let harness = Harness::new();
    harness.write_batch(
        "batch.jsonl",
        &[
            event("e1", "PushEvent", "alice", "org/app", 50),
            event("e2", "PushEvent", "alice", "org/app", 40),
            event("e3", "IssuesEvent", "bob", "org/lib", 30),
        ],
    );
    let (status, _) = harness.send("POST", "/load").await;
    assert_eq!(status, StatusCode::OK);

    let (status, sessions) = harness.send("GET", "/user-sessions?days=1").await;
    assert_eq!(status, StatusCode::OK);
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["actor_login"], "alice");
    assert_eq!(sessions[0]["session_id"], 1);
    assert_eq!(sessions[0]["events_in_session"], 2);
    assert_eq!(sessions[1]["actor_login"], "bob");

    let (status, top) = harness.send("GET", "/top-entities?days=1&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    let top = top.as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["entity_name"], "org/app");
    assert_eq!(top[0]["total_events"], 2);
    assert_eq!(top[0]["push_events"], 2);

    let (status, alias) = harness.send("GET", "/top-repos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alias.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn non_positive_parameters_are_rejected() {
    let harness = Harness::new();
    for uri in [
        "/user-sessions?days=0",
        "/user-sessions?limit=-5",
        "/top-entities?days=-1",
        "/top-repos?limit=0",
    ] {
        let (status, body) = harness.send("GET", uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["code"], "invalid_input", "{uri}");
    }
}

#[tokio::test]
async fn non_integer_parameters_are_bad_requests() {
    let harness = Harness::new();
    let (status, _) = harness.send("GET", "/top-entities?days=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_store_returns_empty_lists() {
    let harness = Harness::new();
    let (status, sessions) = harness.send("GET", "/user-sessions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions, json!([]));
    let (status, top) = harness.send("GET", "/top-entities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(top, json!([]));
}
