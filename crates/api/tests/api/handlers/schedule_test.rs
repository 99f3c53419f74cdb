use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use watchroster_core::models::schedule::{DeleteScheduleResponse, Schedule};

use crate::test_utils::{TestContext, as_admin, as_member};

fn night_watch() -> Value {
    json!({
        "name": "Night watch",
        "cron_pattern": "0 22 * * *",
        "duration_minutes": 480,
        "timezone": "Europe/Amsterdam"
    })
}

#[tokio::test]
async fn test_admin_schedule_lifecycle() {
    let ctx = TestContext::new();

    let created = as_admin(ctx.server.post("/api/schedules"))
        .json(&night_watch())
        .await;
    created.assert_status(StatusCode::CREATED);
    let schedule: Schedule = created.json();
    assert_eq!(schedule.name, "Night watch");
    assert_eq!(schedule.timezone.as_deref(), Some("Europe/Amsterdam"));

    let path = format!("/api/schedules/{}", schedule.id);
    let fetched: Schedule = ctx.server.get(&path).await.json();
    assert_eq!(fetched, schedule);

    let updated = as_admin(ctx.server.put(&path))
        .json(&json!({"name": "Dawn watch", "cron_pattern": "0 5 * * *", "duration_minutes": 120}))
        .await;
    updated.assert_status_ok();
    let updated: Schedule = updated.json();
    assert_eq!(updated.name, "Dawn watch");
    assert_eq!(updated.timezone, None);

    let listed: Vec<Schedule> = ctx.server.get("/api/schedules").await.json();
    assert_eq!(listed, vec![updated]);

    let deleted = as_admin(ctx.server.delete(&path)).await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<DeleteScheduleResponse>().id, schedule.id);
    ctx.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_members_cannot_write_schedules() {
    let ctx = TestContext::new();
    let existing = ctx.schedule("Hourly", "0 * * * *", 60).await;
    let path = format!("/api/schedules/{}", existing.id);

    as_member(ctx.server.post("/api/schedules"), 7)
        .json(&night_watch())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    as_member(ctx.server.put(&path), 7)
        .json(&night_watch())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    as_member(ctx.server.delete(&path), 7)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_schedule_is_bad_request() {
    let ctx = TestContext::new();

    let response = as_admin(ctx.server.post("/api/schedules"))
        .json(&json!({"name": "Broken", "cron_pattern": "whenever", "duration_minutes": 60}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], json!("validation"));
}

#[tokio::test]
async fn test_schedule_with_bookings_cannot_be_deleted() {
    let ctx = TestContext::new();
    let hourly = ctx.schedule("Hourly", "0 * * * *", 60).await;
    as_member(ctx.server.post("/api/bookings"), 7)
        .json(&json!({"schedule_id": hourly.id, "shift_start": "2024-06-03T11:00:00Z"}))
        .await
        .assert_status(StatusCode::CREATED);

    let response = as_admin(ctx.server.delete(&format!("/api/schedules/{}", hourly.id))).await;

    response.assert_status(StatusCode::CONFLICT);
}
