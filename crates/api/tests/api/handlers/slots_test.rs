use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use watchroster_core::models::slot::{AdminSlot, AvailableSlot};

use crate::test_utils::{TestContext, as_admin, as_member, at};

#[tokio::test]
async fn test_slots_default_to_window_from_now() {
    let ctx = TestContext::new();
    let evening = ctx.schedule("Saturday evening", "0 18 * * 6", 120).await;

    let response = ctx.server.get("/api/slots").await;

    response.assert_status_ok();
    let slots: Vec<AvailableSlot> = response.json();
    // Default window is fourteen days: June 1st and 8th (15th is past it).
    let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![at("2024-06-01T18:00:00Z"), at("2024-06-08T18:00:00Z")]);
    assert!(slots.iter().all(|s| s.schedule_id == evening.id));
}

#[tokio::test]
async fn test_slots_honour_window_and_limit() {
    let ctx = TestContext::new();
    ctx.schedule("Hourly", "0 * * * *", 60).await;

    let response = ctx
        .server
        .get("/api/slots")
        .add_query_param("from", "2024-06-03T10:00:00Z")
        .add_query_param("to", "2024-06-03T13:00:00Z")
        .add_query_param("limit", 2)
        .await;

    response.assert_status_ok();
    let slots: Vec<AvailableSlot> = response.json();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start, at("2024-06-03T10:00:00Z"));
    assert_eq!(slots[1].start, at("2024-06-03T11:00:00Z"));
}

#[tokio::test]
async fn test_inverted_window_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/slots")
        .add_query_param("from", "2024-06-03T13:00:00Z")
        .add_query_param("to", "2024-06-03T10:00:00Z")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<serde_json::Value>()["code"], json!("validation"));
}

#[tokio::test]
async fn test_admin_slots_show_bookings() {
    let ctx = TestContext::new();
    let hourly = ctx.schedule("Hourly", "0 * * * *", 60).await;
    let member = ctx.store.add_user("Robin", Some("555-0100")).await;
    as_member(ctx.server.post("/api/bookings"), member.id)
        .json(&json!({"schedule_id": hourly.id, "shift_start": "2024-06-03T11:00:00Z"}))
        .await
        .assert_status(StatusCode::CREATED);

    let response = as_admin(ctx.server.get("/api/admin/slots"))
        .add_query_param("from", "2024-06-03T10:00:00Z")
        .add_query_param("to", "2024-06-03T12:00:00Z")
        .await;

    response.assert_status_ok();
    let slots: Vec<AdminSlot> = response.json();
    assert_eq!(slots.len(), 3);
    assert_eq!(
        slots.iter().map(|s| s.is_booked).collect::<Vec<_>>(),
        vec![false, true, false]
    );
    assert_eq!(slots[1].assignee_name.as_deref(), Some("Robin"));
}

#[tokio::test]
async fn test_admin_slots_require_admin() {
    let ctx = TestContext::new();

    let anonymous = ctx.server.get("/api/admin/slots").await;
    let member = as_member(ctx.server.get("/api/admin/slots"), 7).await;

    anonymous.assert_status(StatusCode::UNAUTHORIZED);
    member.assert_status(StatusCode::FORBIDDEN);
}
