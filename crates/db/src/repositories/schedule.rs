use crate::models::DbSchedule;
use eyre::Result;
use sqlx::{Pool, Postgres};
use watchroster_core::models::schedule::ScheduleRequest;

pub async fn list_schedules(pool: &Pool<Postgres>) -> Result<Vec<DbSchedule>> {
    let schedules = sqlx::query_as::<_, DbSchedule>(
        r#"
        SELECT id, name, cron_pattern, duration_minutes, start_date, end_date, timezone, created_at
        FROM schedules
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

pub async fn get_schedule_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbSchedule>> {
    tracing::debug!("Getting schedule by id: {}", id);

    let schedule = sqlx::query_as::<_, DbSchedule>(
        r#"
        SELECT id, name, cron_pattern, duration_minutes, start_date, end_date, timezone, created_at
        FROM schedules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

pub async fn create_schedule(pool: &Pool<Postgres>, request: &ScheduleRequest) -> Result<DbSchedule> {
    tracing::debug!(
        "Creating schedule: name={}, cron_pattern={}, duration_minutes={}",
        request.name,
        request.cron_pattern,
        request.duration_minutes
    );

    let schedule = sqlx::query_as::<_, DbSchedule>(
        r#"
        INSERT INTO schedules (name, cron_pattern, duration_minutes, start_date, end_date, timezone)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, cron_pattern, duration_minutes, start_date, end_date, timezone, created_at
        "#,
    )
    .bind(&request.name)
    .bind(&request.cron_pattern)
    .bind(request.duration_minutes)
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(&request.timezone)
    .fetch_one(pool)
    .await?;

    Ok(schedule)
}

pub async fn replace_schedule(
    pool: &Pool<Postgres>,
    id: i64,
    request: &ScheduleRequest,
) -> Result<Option<DbSchedule>> {
    let schedule = sqlx::query_as::<_, DbSchedule>(
        r#"
        UPDATE schedules
        SET name = $2, cron_pattern = $3, duration_minutes = $4,
            start_date = $5, end_date = $6, timezone = $7
        WHERE id = $1
        RETURNING id, name, cron_pattern, duration_minutes, start_date, end_date, timezone, created_at
        "#,
    )
    .bind(id)
    .bind(&request.name)
    .bind(&request.cron_pattern)
    .bind(request.duration_minutes)
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(&request.timezone)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

/// Fails with a foreign key violation while bookings still reference the schedule.
pub async fn delete_schedule(pool: &Pool<Postgres>, id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM schedules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
