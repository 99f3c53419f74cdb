use crate::models::DbOutboxEntry;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_outbox_entry(
    pool: &Pool<Postgres>,
    kind: &str,
    payload: serde_json::Value,
) -> Result<DbOutboxEntry> {
    let id = Uuid::new_v4();

    let entry = sqlx::query_as::<_, DbOutboxEntry>(
        r#"
        INSERT INTO notification_outbox (id, kind, payload)
        VALUES ($1, $2, $3)
        RETURNING id, kind, payload, created_at, delivered_at
        "#,
    )
    .bind(id)
    .bind(kind)
    .bind(payload)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Queued notification: id={}, kind={}", entry.id, entry.kind);
    Ok(entry)
}
