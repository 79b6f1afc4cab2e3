use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use reportbot_scheduler::{Schedule, SchedulerError, ScheduleSpec};

use crate::app::AppState;

type ApiError = (StatusCode, Json<Value>);

fn error_body(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(json!({ "detail": detail.into() })))
}

fn map_error(e: SchedulerError) -> ApiError {
    match e {
        SchedulerError::InvalidSpec(msg) => error_body(StatusCode::UNPROCESSABLE_ENTITY, msg),
        SchedulerError::NotFound { id } => {
            error_body(StatusCode::NOT_FOUND, format!("Schedule {id} not found"))
        }
        SchedulerError::Store(_) | SchedulerError::Serialization(_) => {
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /schedules — every stored schedule, active or not.
pub async fn list_schedules(State(state): State<Arc<AppState>>) -> Json<Vec<Schedule>> {
    Json(state.scheduler.list().await)
}

/// POST /schedules — validate, persist, and arm a new schedule.
/// An uncompilable spec (empty days, bad time) returns 422.
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<ScheduleSpec>,
) -> Result<(StatusCode, Json<Schedule>), ApiError> {
    let schedule = state.scheduler.create(spec).await.map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// DELETE /schedules/{id}
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.scheduler.delete(&id).await.map_err(map_error)?;
    if !removed {
        return Err(error_body(
            StatusCode::NOT_FOUND,
            format!("Schedule {id} not found"),
        ));
    }
    Ok(Json(json!({ "status": "deleted", "id": id })))
}

/// PATCH /schedules/{id}/toggle — flip active, returns the updated record.
pub async fn toggle_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Schedule>, ApiError> {
    let updated = state.scheduler.toggle(&id).await.map_err(map_error)?;
    Ok(Json(updated))
}
