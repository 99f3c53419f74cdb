//! # Error Handling Middleware
//!
//! Maps [`WatchError`] onto HTTP status codes and a JSON body of the form
//! `{"error": <message>, "code": <machine code>}`. The code lets a client
//! tell "pick a different slot" (`shift_time_invalid`, `conflict`) apart from
//! "that slot does not exist" (`not_found`).
//!
//! Internal failures are logged here with their full report and answered
//! with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use watchroster_core::errors::WatchError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use watchroster_api::middleware::error_handling::AppError;
/// use watchroster_core::errors::WatchError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id < 0 {
///         return Err(WatchError::NotFound(format!("Schedule with ID {id} not found")).into());
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub WatchError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WatchError::NotFound(_) => StatusCode::NOT_FOUND,
            WatchError::Validation(_) => StatusCode::BAD_REQUEST,
            WatchError::ShiftTimeInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WatchError::Conflict(_) => StatusCode::CONFLICT,
            WatchError::Forbidden(_) => StatusCode::FORBIDDEN,
            WatchError::Authentication(_) => StatusCode::UNAUTHORIZED,
            WatchError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = ?self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": message, "code": self.0.code() }));
        (status, body).into_response()
    }
}

impl From<WatchError> for AppError {
    fn from(err: WatchError) -> Self {
        AppError(err)
    }
}

/// Storage failures reaching a handler directly are internal errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(WatchError::Database(err))
    }
}
