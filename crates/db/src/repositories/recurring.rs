use crate::models::DbAssignment;
use eyre::Result;
use sqlx::{Pool, Postgres};
use watchroster_core::models::recurring::NewAssignment;

pub async fn get_active_assignments(pool: &Pool<Postgres>) -> Result<Vec<DbAssignment>> {
    let assignments = sqlx::query_as::<_, DbAssignment>(
        r#"
        SELECT id, user_id, day_of_week, schedule_id, time_slot, buddy_name, is_active, created_at
        FROM recurring_assignments
        WHERE is_active
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

pub async fn get_assignments_by_user_id(pool: &Pool<Postgres>, user_id: i64) -> Result<Vec<DbAssignment>> {
    let assignments = sqlx::query_as::<_, DbAssignment>(
        r#"
        SELECT id, user_id, day_of_week, schedule_id, time_slot, buddy_name, is_active, created_at
        FROM recurring_assignments
        WHERE user_id = $1 AND is_active
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

pub async fn get_assignment_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbAssignment>> {
    let assignment = sqlx::query_as::<_, DbAssignment>(
        r#"
        SELECT id, user_id, day_of_week, schedule_id, time_slot, buddy_name, is_active, created_at
        FROM recurring_assignments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(assignment)
}

/// Returns `None` when an identical active assignment exists.
pub async fn create_assignment(
    pool: &Pool<Postgres>,
    assignment: &NewAssignment,
) -> Result<Option<DbAssignment>> {
    let created = sqlx::query_as::<_, DbAssignment>(
        r#"
        INSERT INTO recurring_assignments (user_id, day_of_week, schedule_id, time_slot, buddy_name)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, day_of_week, schedule_id, time_slot) WHERE is_active DO NOTHING
        RETURNING id, user_id, day_of_week, schedule_id, time_slot, buddy_name, is_active, created_at
        "#,
    )
    .bind(assignment.user_id)
    .bind(assignment.day_of_week)
    .bind(assignment.schedule_id)
    .bind(&assignment.time_slot)
    .bind(&assignment.buddy_name)
    .fetch_optional(pool)
    .await?;

    Ok(created)
}

pub async fn deactivate_assignment(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbAssignment>> {
    let assignment = sqlx::query_as::<_, DbAssignment>(
        r#"
        UPDATE recurring_assignments
        SET is_active = FALSE
        WHERE id = $1
        RETURNING id, user_id, day_of_week, schedule_id, time_slot, buddy_name, is_active, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(assignment)
}

pub async fn deactivate_assignments_by_schedule_id(pool: &Pool<Postgres>, schedule_id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE recurring_assignments
        SET is_active = FALSE
        WHERE schedule_id = $1 AND is_active
        "#,
    )
    .bind(schedule_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
