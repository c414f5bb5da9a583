//! Router fixtures shared by handler tests

use crate::storage::{ConnectionManager, Database};
use crate::upstream::EgovClient;
use crate::AppState;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_TOKEN: &str = "test-token";

/// App state backed by an in-memory store and an upstream at `base_url`
pub struct TestApp {
    pub state: AppState,
    pub db: Arc<Database>,
    pub connections: Arc<ConnectionManager>,
}

impl TestApp {
    pub fn new(base_url: &str) -> Self {
        let connections = Arc::new(ConnectionManager::new("sqlite::memory:"));
        let db = Arc::new(Database::new(connections.clone()));
        let state = AppState {
            upstream: Arc::new(EgovClient::new(base_url, TEST_TOKEN)),
            listings: db.clone(),
            passports: db.clone(),
            connections: connections.clone(),
        };

        Self {
            state,
            db,
            connections,
        }
    }

    pub fn router(&self) -> Router {
        crate::app(self.state.clone())
    }
}

pub async fn send(router: Router, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, headers, body)
}

pub fn json(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}
