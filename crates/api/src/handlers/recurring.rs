use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use std::sync::Arc;
use watchroster_core::{
    models::recurring::{CreateAssignmentRequest, RecurringAssignment},
    recurring,
};

use crate::{
    ApiState,
    middleware::{auth::acting_user, error_handling::AppError},
};

/// Admins may list another member's assignments; members get their own.
#[derive(Debug, Default, Deserialize)]
pub struct AssignmentsQuery {
    pub user_id: Option<i64>,
}

#[axum::debug_handler]
pub async fn list_assignments(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Query(query): Query<AssignmentsQuery>,
) -> Result<Json<Vec<RecurringAssignment>>, AppError> {
    let actor = acting_user(&headers)?;
    let user_id = query.user_id.unwrap_or(actor.user_id);

    let assignments = recurring::list_assignments(state.store.as_ref(), &actor, user_id).await?;

    Ok(Json(assignments))
}

#[axum::debug_handler]
pub async fn create_assignment(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<RecurringAssignment>), AppError> {
    let actor = acting_user(&headers)?;

    let assignment = recurring::create_assignment(state.store.as_ref(), &actor, payload).await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

#[axum::debug_handler]
pub async fn deactivate_assignment(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<RecurringAssignment>, AppError> {
    let actor = acting_user(&headers)?;

    let assignment = recurring::deactivate_assignment(state.store.as_ref(), &actor, id).await?;

    Ok(Json(assignment))
}
