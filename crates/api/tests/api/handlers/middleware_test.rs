use std::sync::Arc;

use axum::{
    body::to_bytes,
    http::StatusCode,
    response::IntoResponse,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use watchroster_api::middleware::error_handling::AppError;
use watchroster_core::errors::WatchError;
use watchroster_db::mock::MockStore;

use crate::test_utils::{TestContext, server_with_store};

async fn body_of(error: WatchError) -> (StatusCode, Value) {
    let response = AppError(error).into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, serde_json::from_slice(&bytes).expect("Body is not JSON"))
}

#[rstest]
#[case(WatchError::NotFound("gone".into()), StatusCode::NOT_FOUND, "not_found")]
#[case(WatchError::Validation("bad".into()), StatusCode::BAD_REQUEST, "validation")]
#[case(WatchError::ShiftTimeInvalid("10:15".into()), StatusCode::UNPROCESSABLE_ENTITY, "shift_time_invalid")]
#[case(WatchError::Conflict("taken".into()), StatusCode::CONFLICT, "conflict")]
#[case(WatchError::Forbidden("no".into()), StatusCode::FORBIDDEN, "forbidden")]
#[case(WatchError::Authentication("who".into()), StatusCode::UNAUTHORIZED, "unauthenticated")]
#[tokio::test]
async fn test_client_errors_keep_their_message(
    #[case] error: WatchError,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let message = error.to_string();

    let (got_status, body) = body_of(error).await;

    assert_eq!(got_status, status);
    assert_eq!(body, json!({"error": message, "code": code}));
}

#[test_log::test(tokio::test)]
async fn test_internal_errors_hide_details() {
    let (status, body) = body_of(WatchError::Database(eyre::eyre!("password=hunter2"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error", "code": "internal"}));
}

#[test_log::test(tokio::test)]
async fn test_storage_failure_surfaces_as_internal() {
    let mut store = MockStore::new();
    store
        .expect_list_schedules()
        .returning(|| Err(eyre::eyre!("connection refused")));
    let server = server_with_store(Arc::new(store));

    let response = server.get("/api/schedules").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], json!("internal"));
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let health = ctx.server.get("/health").await;
    let version = ctx.server.get("/version").await;

    health.assert_status_ok();
    assert_eq!(health.json::<Value>(), json!({"status": "ok"}));
    assert_eq!(version.json::<Value>()["version"], json!(env!("CARGO_PKG_VERSION")));
}
