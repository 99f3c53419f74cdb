use axum::{Json, extract::State, http::HeaderMap};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use watchroster_core::{
    materialize::{self, MaterializeReport},
    occurrence::Window,
};

use crate::{
    ApiState,
    middleware::{auth::acting_admin, error_handling::AppError},
};

/// Both bounds optional; the default is the configured horizon from now.
#[derive(Debug, Default, Deserialize)]
pub struct MaterializeRequest {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

#[axum::debug_handler]
pub async fn run_materialize(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    payload: Option<Json<MaterializeRequest>>,
) -> Result<Json<MaterializeReport>, AppError> {
    let actor = acting_admin(&headers)?;
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let from = request.from.unwrap_or_else(|| state.clock.now());
    let to = request
        .to
        .unwrap_or_else(|| from + Duration::days(state.settings.materialize_horizon_days));
    let window = Window::new(from, to)?;

    info!(user_id = actor.user_id, from = %window.from, to = %window.to, "Materialization requested");
    let report = materialize::materialize(
        state.store.as_ref(),
        &window,
        state.settings.occurrence_cap_per_schedule,
    )
    .await?;

    Ok(Json(report))
}
