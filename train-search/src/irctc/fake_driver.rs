//! In-process WebDriver server for session lifecycle tests.
//!
//! Opens sessions, refuses every navigation, and records which sessions
//! were deleted.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const SESSION_ID: &str = "fake-session";

#[derive(Clone, Default)]
pub struct FakeDriver {
    deleted: Arc<Mutex<Vec<String>>>,
}

impl FakeDriver {
    /// Serve on an ephemeral port, returning the driver and its base URL.
    pub async fn start() -> (Self, String) {
        let driver = FakeDriver::default();
        let app = Router::new()
            .route("/session", post(new_session))
            .route("/session/:id/url", post(navigate))
            .route("/session/:id", delete(delete_session))
            .with_state(driver.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (driver, format!("http://{addr}"))
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

async fn new_session() -> Json<Value> {
    Json(json!({"value": {"sessionId": SESSION_ID, "capabilities": {}}}))
}

async fn navigate(Path(_id): Path<String>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"value": {
            "error": "unknown error",
            "message": "net::ERR_NAME_NOT_RESOLVED"
        }})),
    )
}

async fn delete_session(
    State(driver): State<FakeDriver>,
    Path(id): Path<String>,
) -> Json<Value> {
    driver.deleted.lock().unwrap().push(id);
    Json(json!({"value": null}))
}
