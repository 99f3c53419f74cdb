use crate::models::DbUser;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, phone
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// `phone` must already be normalized; stored numbers are normalized on write.
pub async fn get_user_by_phone(pool: &Pool<Postgres>, phone: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, phone
        FROM users
        WHERE phone = $1
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
