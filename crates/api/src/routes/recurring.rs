use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/recurring",
            get(handlers::recurring::list_assignments).post(handlers::recurring::create_assignment),
        )
        .route(
            "/api/recurring/:id",
            delete(handlers::recurring::deactivate_assignment),
        )
        .route("/api/admin/materialize", post(handlers::admin::run_materialize))
}
