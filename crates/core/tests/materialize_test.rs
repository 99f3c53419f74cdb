mod common;

use common::{at, request, seed_schedule};
use pretty_assertions::assert_eq;
use watchroster_core::{
    booking::create_booking,
    clock::FixedClock,
    materialize::{MaterializeReport, materialize, materialize_upcoming},
    models::{
        booking::CreateBookingRequest,
        recurring::{NewAssignment, RecurringAssignment},
    },
    notify::NoopNotifier,
    occurrence::Window,
    store::{AssignmentRepository, MemoryStore},
};

const CAP: usize = 5000;

/// 2024-06-01 is a Saturday.
fn saturday() -> Window {
    Window::new(at("2024-06-01T00:00:00Z"), at("2024-06-01T23:59:59Z")).unwrap()
}

async fn assign(
    store: &MemoryStore,
    user_id: i64,
    day_of_week: i16,
    schedule_id: i64,
    slot: &str,
) -> RecurringAssignment {
    store
        .insert_assignment(NewAssignment {
            user_id,
            day_of_week,
            schedule_id,
            time_slot: slot.to_string(),
            buddy_name: Some("Pat".to_string()),
        })
        .await
        .unwrap()
        .created()
        .expect("assignment should be new")
}

#[tokio::test]
async fn test_materialize_is_idempotent() {
    let store = MemoryStore::new();
    let evening = seed_schedule(&store, request("Saturday evening", "0 18 * * 6", 120)).await;
    assign(&store, 7, 6, evening.id, "18:00-20:00").await;

    let first = materialize(&store, &saturday(), CAP).await.unwrap();
    let second = materialize(&store, &saturday(), CAP).await.unwrap();

    assert_eq!(first.created, 1);
    assert_eq!(second.created, 0);
    assert_eq!(second.already_booked, 1);

    let bookings = store.all_bookings().await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].user_id, 7);
    assert_eq!(bookings[0].shift_start, at("2024-06-01T18:00:00Z"));
    assert_eq!(bookings[0].shift_end, at("2024-06-01T20:00:00Z"));
    assert_eq!(bookings[0].buddy_name.as_deref(), Some("Pat"));
}

#[tokio::test]
async fn test_only_matching_fingerprints_are_booked() {
    let store = MemoryStore::new();
    let daily = seed_schedule(&store, request("Daily evening", "0 18 * * *", 120)).await;
    assign(&store, 7, 6, daily.id, "18:00-20:00").await;
    // Wrong slot length and wrong day never match.
    assign(&store, 8, 0, daily.id, "18:00-20:00").await;
    assign(&store, 9, 6, daily.id, "18:00-19:00").await;

    let week = Window::new(at("2024-05-27T00:00:00Z"), at("2024-06-02T00:00:00Z")).unwrap();
    let report = materialize(&store, &week, CAP).await.unwrap();

    // Monday 27th through Saturday 1st: six occurrences, only Saturday matches.
    assert_eq!(
        report,
        MaterializeReport {
            created: 1,
            already_booked: 0,
            unmatched: 5,
            failed: 0,
        }
    );
    let bookings = store.all_bookings().await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].user_id, 7);
}

#[tokio::test]
async fn test_earliest_assignment_wins_shared_slot() {
    let store = MemoryStore::new();
    let evening = seed_schedule(&store, request("Saturday evening", "0 18 * * 6", 120)).await;
    let earlier = assign(&store, 7, 6, evening.id, "18:00-20:00").await;
    let later = assign(&store, 8, 6, evening.id, "18:00-20:00").await;
    assert!(earlier.id < later.id);

    let report = materialize(&store, &saturday(), CAP).await.unwrap();

    assert_eq!(report.created, 1);
    let bookings = store.all_bookings().await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].user_id, 7);
}

#[tokio::test]
async fn test_direct_booking_is_never_overwritten() {
    let store = MemoryStore::new();
    let evening = seed_schedule(&store, request("Saturday evening", "0 18 * * 6", 120)).await;
    assign(&store, 7, 6, evening.id, "18:00-20:00").await;
    let direct = create_booking(
        &store,
        &NoopNotifier,
        99,
        CreateBookingRequest {
            schedule_id: evening.id,
            shift_start: at("2024-06-01T18:00:00Z"),
            buddy_phone: None,
            buddy_name: None,
        },
    )
    .await
    .unwrap();

    let report = materialize(&store, &saturday(), CAP).await.unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.already_booked, 1);
    assert_eq!(store.all_bookings().await, vec![direct]);
}

#[tokio::test]
async fn test_fingerprint_is_read_in_schedule_timezone() {
    let store = MemoryStore::new();
    let mut tokyo = request("Tokyo morning", "0 8 * * 0", 60);
    tokyo.timezone = Some("Asia/Tokyo".to_string());
    let tokyo = seed_schedule(&store, tokyo).await;
    // Sunday 08:00 in Tokyo is Saturday 23:00 UTC.
    assign(&store, 7, 0, tokyo.id, "08:00-09:00").await;

    let report = materialize(&store, &saturday(), CAP).await.unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(store.all_bookings().await[0].shift_start, at("2024-06-01T23:00:00Z"));
}

#[tokio::test]
async fn test_overlapping_runs_do_not_duplicate() {
    let store = MemoryStore::new();
    let daily = seed_schedule(&store, request("Daily evening", "0 18 * * *", 120)).await;
    for day in 0..=6 {
        assign(&store, 7, day, daily.id, "18:00-20:00").await;
    }

    let clock_a = FixedClock(at("2024-06-01T00:00:00Z"));
    let clock_b = FixedClock(at("2024-06-04T00:00:00Z"));
    let first = materialize_upcoming(&store, &clock_a, 7, CAP).await.unwrap();
    let second = materialize_upcoming(&store, &clock_b, 7, CAP).await.unwrap();

    assert_eq!(first.created, 7);
    // 4th through 10th: the 4th..7th already exist.
    assert_eq!(second.created, 3);
    assert_eq!(second.already_booked, 4);
    assert_eq!(store.all_bookings().await.len(), 10);
}

#[tokio::test]
async fn test_no_assignments_is_an_empty_report() {
    let store = MemoryStore::new();
    seed_schedule(&store, request("Hourly", "0 * * * *", 60)).await;

    let report = materialize(&store, &saturday(), CAP).await.unwrap();

    assert_eq!(report, MaterializeReport::default());
    assert!(store.all_bookings().await.is_empty());
}
