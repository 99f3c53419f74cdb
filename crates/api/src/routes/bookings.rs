use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings/me", get(handlers::bookings::list_my_bookings))
        .route(
            "/api/bookings/:id/attendance",
            put(handlers::bookings::mark_attendance),
        )
}
