use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use watchroster_core::{
    models::schedule::{DeleteScheduleResponse, Schedule, ScheduleRequest},
    schedules,
};

use crate::{
    ApiState,
    middleware::{
        auth::{acting_admin, acting_user},
        error_handling::AppError,
    },
};

#[axum::debug_handler]
pub async fn list_schedules(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = schedules::list_schedules(state.store.as_ref()).await?;
    Ok(Json(schedules))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = schedules::get_schedule(state.store.as_ref(), id).await?;
    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let actor = acting_user(&headers)?;

    let schedule = schedules::create_schedule(state.store.as_ref(), &actor, payload).await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    let actor = acting_user(&headers)?;

    let schedule = schedules::update_schedule(state.store.as_ref(), &actor, id, payload).await?;

    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<DeleteScheduleResponse>, AppError> {
    let actor = acting_admin(&headers)?;

    let response = schedules::delete_schedule(state.store.as_ref(), &actor, id).await?;

    Ok(Json(response))
}
