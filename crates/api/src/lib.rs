//! # WatchRoster API
//!
//! HTTP surface of the shift roster: open-slot listing, booking, attendance,
//! schedule administration, recurring assignments and on-demand
//! materialization.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP into calls on the engine in `watchroster-core`
//! - **Middleware**: Acting-user extraction and error-to-status mapping
//! - **Config**: Environment configuration
//!
//! Handlers only ever see the storage, notification and clock seams, so the
//! same router runs against Postgres in production and against the
//! in-memory store in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Acting user and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use watchroster_core::{
    clock::{Clock, SystemClock},
    config::EngineSettings,
    notify::Notifier,
    store::ShiftStore,
};

use crate::middleware::auth::{USER_ID_HEADER, USER_ROLE_HEADER};

/// Shared application state that is accessible to all request handlers.
pub struct ApiState {
    pub store: Arc<dyn ShiftStore>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub settings: EngineSettings,
}

impl ApiState {
    pub fn new(
        store: Arc<dyn ShiftStore>,
        notifier: Arc<dyn Notifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// All routes with request tracing, without the deployment layers.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Open slots, admin view
        .merge(routes::slots::routes())
        .merge(routes::bookings::routes())
        .merge(routes::schedule::routes())
        // Recurring assignments and materialization
        .merge(routes::recurring::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server: installs logging, builds the router and serves it.
///
/// # Example
///
/// ```rust,ignore
/// let config = config::ApiConfig::from_env()?;
/// let pool = watchroster_db::create_pool(&config.database_url, config.max_connections).await?;
/// let state = ApiState::new(
///     Arc::new(PgStore::new(pool.clone())),
///     Arc::new(OutboxNotifier::new(pool)),
///     config.engine.clone(),
/// );
/// start_server(config, state).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, state: ApiState) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = router(Arc::new(state));

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
