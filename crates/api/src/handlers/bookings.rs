use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use watchroster_core::{
    booking,
    models::booking::{Booking, CreateBookingRequest, MarkAttendanceRequest},
};

use crate::{
    ApiState,
    middleware::{auth::acting_user, error_handling::AppError},
};

#[derive(Debug, Default, Deserialize)]
pub struct MyBookingsQuery {
    pub from: Option<DateTime<Utc>>,
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let actor = acting_user(&headers)?;

    let booking = booking::create_booking(
        state.store.as_ref(),
        state.notifier.as_ref(),
        actor.user_id,
        payload,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn list_my_bookings(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Query(query): Query<MyBookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let actor = acting_user(&headers)?;

    let bookings =
        booking::list_user_bookings(state.store.as_ref(), actor.user_id, query.from).await?;

    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn mark_attendance(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<Json<Booking>, AppError> {
    let actor = acting_user(&headers)?;

    let booking =
        booking::mark_attendance(state.store.as_ref(), id, actor.user_id, payload.attended)
            .await?;

    Ok(Json(booking))
}
