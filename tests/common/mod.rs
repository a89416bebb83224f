#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const TASK_PATH: &str = "/api/v0/tasks/6f08f386-0dfe-4cd4-a1b4-91e95411c883";

/// In-process stand-in for the boefje task API.
#[derive(Clone)]
pub struct MockApi {
    pub base: String,
    received: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct ApiState {
    task: Arc<Value>,
    received: Arc<Mutex<Vec<Value>>>,
}

impl MockApi {
    /// Serve the task built by `make_task`, which receives the server's base URL.
    pub async fn start<F>(make_task: F) -> Self
    where
        F: FnOnce(&str) -> Value,
    {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let received = Arc::new(Mutex::new(Vec::new()));

        let state = ApiState {
            task: Arc::new(make_task(&base)),
            received: received.clone(),
        };

        let app = Router::new()
            .route(TASK_PATH, get(get_task).post(post_result))
            .route("/api/v0/tasks/broken", post(reject_result))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base, received }
    }

    pub fn task_url(&self) -> String {
        format!("{}{}", self.base, TASK_PATH)
    }

    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn get_task(State(state): State<ApiState>) -> Json<Value> {
    Json((*state.task).clone())
}

async fn post_result(State(state): State<ApiState>, Json(body): Json<Value>) -> StatusCode {
    state.received.lock().unwrap().push(body);
    StatusCode::OK
}

async fn reject_result() -> (StatusCode, Json<Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"detail": "Task does not have status running"})),
    )
}

/// Task descriptor for an IP address input.
pub fn ip_task(output_url: &str) -> Value {
    json!({
        "task_id": "6f08f386-0dfe-4cd4-a1b4-91e95411c883",
        "output_url": output_url,
        "boefje_meta": {
            "id": "6f08f386-0dfe-4cd4-a1b4-91e95411c883",
            "boefje": { "id": "nikto", "version": null },
            "input_ooi": "IPAddressV4|internet|127.0.0.1",
            "arguments": { "input": { "object_type": "IPAddressV4", "address": "127.0.0.1" } },
            "organization": "test",
            "environment": {}
        }
    })
}

/// Write an executable shell script.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
