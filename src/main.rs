use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use watchroster_api::{ApiState, config::ApiConfig};
use watchroster_db::{OutboxNotifier, PgStore, create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.max_connections).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let state = ApiState::new(
        Arc::new(PgStore::new(db_pool.clone())),
        Arc::new(OutboxNotifier::new(db_pool)),
        config.engine.clone(),
    );

    // Start API server
    watchroster_api::start_server(config, state).await?;

    Ok(())
}
