use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use reportbot_core::types::{ReportType, Tone};

use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub report_type: ReportType,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub notes: String,
}

/// POST /generate/report — draft a report on demand, without touching
/// the schedule registry or sending mail.
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let summary = state.activity.summary();
    let content = state
        .agent
        .generate(req.report_type, &summary, &req.notes, req.tone)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": e.to_string() })),
            )
        })?;

    Ok(Json(json!({
        "report_type": req.report_type,
        "content": content,
        "generated_at": Utc::now().to_rfc3339(),
    })))
}
