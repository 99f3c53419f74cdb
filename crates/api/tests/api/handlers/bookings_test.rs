use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use watchroster_core::models::booking::Booking;

use crate::test_utils::{TestContext, as_member, at};

#[tokio::test]
async fn test_create_booking_returns_created() {
    let ctx = TestContext::new();
    let hourly = ctx.schedule("Hourly", "0 * * * *", 60).await;

    let response = as_member(ctx.server.post("/api/bookings"), 7)
        .json(&json!({
            "schedule_id": hourly.id,
            "shift_start": "2024-06-03T11:00:00Z",
            "buddy_name": "Sam"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let booking: Booking = response.json();
    assert_eq!(booking.user_id, 7);
    assert_eq!(booking.shift_end, at("2024-06-03T12:00:00Z"));
    assert_eq!(booking.buddy_name.as_deref(), Some("Sam"));
    assert_eq!(ctx.notifier.queued().await.len(), 1);
}

#[rstest]
#[case("2024-06-03T11:15:00Z", StatusCode::UNPROCESSABLE_ENTITY, "shift_time_invalid")]
#[case("not a time", StatusCode::UNPROCESSABLE_ENTITY, "")]
#[tokio::test]
async fn test_invalid_shift_start(
    #[case] shift_start: &str,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let ctx = TestContext::new();
    let hourly = ctx.schedule("Hourly", "0 * * * *", 60).await;

    let response = as_member(ctx.server.post("/api/bookings"), 7)
        .json(&json!({"schedule_id": hourly.id, "shift_start": shift_start}))
        .await;

    response.assert_status(status);
    if !code.is_empty() {
        assert_eq!(response.json::<Value>()["code"], json!(code));
    }
}

#[tokio::test]
async fn test_double_booking_conflicts() {
    let ctx = TestContext::new();
    let hourly = ctx.schedule("Hourly", "0 * * * *", 60).await;
    let body = json!({"schedule_id": hourly.id, "shift_start": "2024-06-03T11:00:00Z"});

    as_member(ctx.server.post("/api/bookings"), 7)
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
    let second = as_member(ctx.server.post("/api/bookings"), 8).json(&body).await;

    second.assert_status(StatusCode::CONFLICT);
    assert_eq!(second.json::<Value>()["code"], json!("conflict"));
}

#[tokio::test]
async fn test_unknown_schedule_is_not_found() {
    let ctx = TestContext::new();

    let response = as_member(ctx.server.post("/api/bookings"), 7)
        .json(&json!({"schedule_id": 999, "shift_start": "2024-06-03T11:00:00Z"}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], json!("not_found"));
}

#[tokio::test]
async fn test_booking_requires_identity() {
    let ctx = TestContext::new();
    let hourly = ctx.schedule("Hourly", "0 * * * *", 60).await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&json!({"schedule_id": hourly.id, "shift_start": "2024-06-03T11:00:00Z"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], json!("unauthenticated"));
}

#[tokio::test]
async fn test_my_bookings_and_attendance() {
    let ctx = TestContext::new();
    let hourly = ctx.schedule("Hourly", "0 * * * *", 60).await;
    for start in ["2024-06-03T12:00:00Z", "2024-06-03T11:00:00Z"] {
        as_member(ctx.server.post("/api/bookings"), 7)
            .json(&json!({"schedule_id": hourly.id, "shift_start": start}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let mine: Vec<Booking> = as_member(ctx.server.get("/api/bookings/me"), 7).await.json();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].shift_start, at("2024-06-03T11:00:00Z"));

    let later: Vec<Booking> = as_member(ctx.server.get("/api/bookings/me"), 7)
        .add_query_param("from", "2024-06-03T11:30:00Z")
        .await
        .json();
    assert_eq!(later.len(), 1);

    let path = format!("/api/bookings/{}/attendance", mine[0].id);
    as_member(ctx.server.put(&path), 8)
        .json(&json!({"attended": true}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let marked = as_member(ctx.server.put(&path), 7)
        .json(&json!({"attended": true}))
        .await;
    marked.assert_status_ok();
    assert!(marked.json::<Booking>().attended);
}
