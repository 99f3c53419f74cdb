//! One bounded materialization run over `[now, now + MATERIALIZE_HORIZON_DAYS]`.
//! Meant to be fired by an external scheduler; exits non-zero only when the
//! run as a whole could not start.

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use watchroster_api::config::parse_log_level;
use watchroster_core::{clock::SystemClock, config::EngineSettings, materialize::materialize_upcoming};
use watchroster_db::{PgStore, create_pool};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let log_level = parse_log_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;
    let settings = EngineSettings::from_env()?;

    let db_pool = create_pool(&database_url, 2).await?;
    let store = PgStore::new(db_pool);

    info!(horizon_days = settings.materialize_horizon_days, "Starting materialization run");
    let report = materialize_upcoming(
        &store,
        &SystemClock,
        settings.materialize_horizon_days,
        settings.occurrence_cap_per_schedule,
    )
    .await?;

    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
