use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /templates — names of the stored report templates.
pub async fn list_templates(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "templates": state.agent.template_names() }))
}

/// DELETE /templates/{name}
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.agent.delete_template(&name) {
        Ok(true) => Ok(Json(json!({ "status": "deleted", "name": name }))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": format!("Template {name} not found") })),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": e.to_string() })),
        )),
    }
}
