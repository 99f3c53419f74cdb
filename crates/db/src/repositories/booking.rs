use crate::models::DbBooking;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use watchroster_core::models::booking::NewBooking;

/// Returns `None` when `(schedule_id, shift_start)` is already booked.
pub async fn create_booking(pool: &Pool<Postgres>, booking: &NewBooking) -> Result<Option<DbBooking>> {
    let created = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (schedule_id, user_id, shift_start, shift_end, buddy_user_id, buddy_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT ON CONSTRAINT bookings_occurrence_key DO NOTHING
        RETURNING id, schedule_id, user_id, shift_start, shift_end, buddy_user_id, buddy_name, attended, created_at
        "#,
    )
    .bind(booking.schedule_id)
    .bind(booking.user_id)
    .bind(booking.shift_start)
    .bind(booking.shift_end)
    .bind(booking.buddy_user_id)
    .bind(&booking.buddy_name)
    .fetch_optional(pool)
    .await?;

    if created.is_none() {
        tracing::debug!(
            "Booking already exists: schedule_id={}, shift_start={}",
            booking.schedule_id,
            booking.shift_start
        );
    }

    Ok(created)
}

pub async fn get_booking_by_occurrence(
    pool: &Pool<Postgres>,
    schedule_id: i64,
    shift_start: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, schedule_id, user_id, shift_start, shift_end, buddy_user_id, buddy_name, attended, created_at
        FROM bookings
        WHERE schedule_id = $1 AND shift_start = $2
        "#,
    )
    .bind(schedule_id)
    .bind(shift_start)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, schedule_id, user_id, shift_start, shift_end, buddy_user_id, buddy_name, attended, created_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn set_attendance(
    pool: &Pool<Postgres>,
    id: i64,
    attended: bool,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET attended = $2
        WHERE id = $1
        RETURNING id, schedule_id, user_id, shift_start, shift_end, buddy_user_id, buddy_name, attended, created_at
        "#,
    )
    .bind(id)
    .bind(attended)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_bookings_by_user_id(
    pool: &Pool<Postgres>,
    user_id: i64,
    from: Option<DateTime<Utc>>,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, schedule_id, user_id, shift_start, shift_end, buddy_user_id, buddy_name, attended, created_at
        FROM bookings
        WHERE user_id = $1 AND ($2::timestamptz IS NULL OR shift_start >= $2)
        ORDER BY shift_start ASC, id ASC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn count_bookings_by_schedule_id(pool: &Pool<Postgres>, schedule_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM bookings
        WHERE schedule_id = $1
        "#,
    )
    .bind(schedule_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
