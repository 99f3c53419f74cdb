use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: [&str; 4] = [
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_recurring_assignments_active_key
        ON recurring_assignments(user_id, day_of_week, schedule_id, time_slot)
        WHERE is_active
    "#,
    "CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id, shift_start)",
    "CREATE INDEX IF NOT EXISTS idx_recurring_assignments_schedule_id ON recurring_assignments(schedule_id)",
    "CREATE INDEX IF NOT EXISTS idx_notification_outbox_unsent ON notification_outbox(created_at) WHERE delivered_at IS NULL",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Accounts are owned by the authentication service; this is its read model.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            phone VARCHAR(32) NULL UNIQUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedules (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            cron_pattern VARCHAR(255) NOT NULL,
            duration_minutes INTEGER NOT NULL,
            start_date DATE NULL,
            end_date DATE NULL,
            timezone VARCHAR(64) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_duration CHECK (duration_minutes BETWEEN 1 AND 1440),
            CONSTRAINT valid_date_range CHECK (end_date IS NULL OR start_date IS NULL OR end_date >= start_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // The unique key on (schedule_id, shift_start) is the only double-booking guard.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id BIGSERIAL PRIMARY KEY,
            schedule_id BIGINT NOT NULL REFERENCES schedules(id),
            user_id BIGINT NOT NULL REFERENCES users(id),
            shift_start TIMESTAMP WITH TIME ZONE NOT NULL,
            shift_end TIMESTAMP WITH TIME ZONE NOT NULL,
            buddy_user_id BIGINT NULL REFERENCES users(id),
            buddy_name VARCHAR(255) NULL,
            attended BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT bookings_occurrence_key UNIQUE (schedule_id, shift_start),
            CONSTRAINT valid_shift_range CHECK (shift_end > shift_start)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recurring_assignments (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            day_of_week SMALLINT NOT NULL,
            schedule_id BIGINT NOT NULL REFERENCES schedules(id),
            time_slot VARCHAR(11) NOT NULL,
            buddy_name VARCHAR(255) NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notification_outbox (
            id UUID PRIMARY KEY,
            kind VARCHAR(64) NOT NULL,
            payload JSONB NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            delivered_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One statement per query; prepared statements cannot hold several.
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
