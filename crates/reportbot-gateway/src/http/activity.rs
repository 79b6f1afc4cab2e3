use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use reportbot_core::types::ActivitySummary;

use crate::app::AppState;

/// GET /activity/summary — the persisted session summary (zeroed when
/// no session data exists yet).
pub async fn activity_summary(State(state): State<Arc<AppState>>) -> Json<ActivitySummary> {
    Json(state.activity.summary())
}

/// GET /activity/status
pub async fn activity_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "running": state.activity.is_running() }))
}

/// POST /activity/start — idempotent; reports whether a new sampling
/// loop was spawned.
pub async fn start_monitoring(State(state): State<Arc<AppState>>) -> Json<Value> {
    let started = state.activity.start(state.config.activity.sample_interval_secs);
    Json(json!({
        "status": if started { "started" } else { "already_running" },
    }))
}

/// POST /activity/stop
pub async fn stop_monitoring(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.activity.stop();
    Json(json!({ "status": "stopped" }))
}
