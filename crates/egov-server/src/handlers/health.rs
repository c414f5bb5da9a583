//! Liveness probe

use crate::storage::ConnectionState;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Reports the store state without forcing a connect
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store = match state.connections.state().await {
        ConnectionState::Disconnected => "disconnected",
        ConnectionState::Connecting => "connecting",
        ConnectionState::Connected => "connected",
    };

    Json(json!({
        "status": "ok",
        "store": store,
    }))
}
