use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use std::sync::Arc;
use watchroster_core::{
    availability,
    models::slot::{AdminSlot, AvailableSlot, SlotQuery},
};

use crate::{
    ApiState,
    middleware::{auth::acting_admin, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn list_available_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<AvailableSlot>>, AppError> {
    let (window, limit) = availability::resolve_query(&query, state.clock.now(), &state.settings)?;
    let slots = availability::list_available_slots(
        state.store.as_ref(),
        &window,
        Some(limit),
        state.settings.occurrence_cap_per_schedule,
    )
    .await?;

    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn list_admin_slots(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<AdminSlot>>, AppError> {
    acting_admin(&headers)?;

    let (window, limit) = availability::resolve_query(&query, state.clock.now(), &state.settings)?;
    let slots = availability::list_admin_slots(
        state.store.as_ref(),
        &window,
        Some(limit),
        state.settings.occurrence_cap_per_schedule,
    )
    .await?;

    Ok(Json(slots))
}
