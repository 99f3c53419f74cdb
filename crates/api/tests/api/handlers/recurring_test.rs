use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use watchroster_core::{
    materialize::MaterializeReport,
    models::recurring::RecurringAssignment,
};

use crate::test_utils::{TestContext, as_admin, as_member, at};

#[tokio::test]
async fn test_member_manages_own_assignments() {
    let ctx = TestContext::new();
    let evening = ctx.schedule("Saturday evening", "0 18 * * 6", 120).await;

    let created = as_member(ctx.server.post("/api/recurring"), 7)
        .json(&json!({"day_of_week": 6, "schedule_id": evening.id, "time_slot": "18:00-20:00"}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let assignment: RecurringAssignment = created.json();
    assert_eq!(assignment.user_id, 7);

    let listed: Vec<RecurringAssignment> = as_member(ctx.server.get("/api/recurring"), 7).await.json();
    assert_eq!(listed, vec![assignment.clone()]);

    as_member(ctx.server.get("/api/recurring"), 8)
        .add_query_param("user_id", 7)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let path = format!("/api/recurring/{}", assignment.id);
    as_member(ctx.server.delete(&path), 8)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    let removed = as_member(ctx.server.delete(&path), 7).await;
    removed.assert_status_ok();
    assert!(!removed.json::<RecurringAssignment>().is_active);
}

#[tokio::test]
async fn test_malformed_time_slot_is_bad_request() {
    let ctx = TestContext::new();
    let evening = ctx.schedule("Saturday evening", "0 18 * * 6", 120).await;

    as_member(ctx.server.post("/api/recurring"), 7)
        .json(&json!({"day_of_week": 6, "schedule_id": evening.id, "time_slot": "6pm-8pm"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_materialize_books_matching_occurrences() {
    let ctx = TestContext::new();
    let evening = ctx.schedule("Saturday evening", "0 18 * * 6", 120).await;
    as_admin(ctx.server.post("/api/recurring"))
        .json(&json!({
            "user_id": 7,
            "day_of_week": 6,
            "schedule_id": evening.id,
            "time_slot": "18:00-20:00"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let window = json!({"from": "2024-06-01T00:00:00Z", "to": "2024-06-15T00:00:00Z"});
    let first = as_admin(ctx.server.post("/api/admin/materialize")).json(&window).await;
    let second = as_admin(ctx.server.post("/api/admin/materialize")).json(&window).await;

    first.assert_status_ok();
    assert_eq!(first.json::<MaterializeReport>().created, 2);
    assert_eq!(second.json::<MaterializeReport>().created, 0);

    let bookings = ctx.store.all_bookings().await;
    let starts: Vec<_> = bookings.iter().map(|b| b.shift_start).collect();
    assert_eq!(starts, vec![at("2024-06-01T18:00:00Z"), at("2024-06-08T18:00:00Z")]);
    assert!(bookings.iter().all(|b| b.user_id == 7));
}

#[tokio::test]
async fn test_materialize_defaults_to_horizon_and_requires_admin() {
    let ctx = TestContext::new();
    let evening = ctx.schedule("Saturday evening", "0 18 * * 6", 120).await;
    as_member(ctx.server.post("/api/recurring"), 7)
        .json(&json!({"day_of_week": 6, "schedule_id": evening.id, "time_slot": "18:00-20:00"}))
        .await
        .assert_status(StatusCode::CREATED);

    as_member(ctx.server.post("/api/admin/materialize"), 7)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // Twenty-eight days from June 1st: the 1st, 8th, 15th, 22nd.
    let report: MaterializeReport = as_admin(ctx.server.post("/api/admin/materialize")).await.json();
    assert_eq!(report.created, 4);
}
