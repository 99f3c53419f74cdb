use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::{DateTime, Utc};
use watchroster_api::{
    ApiState,
    middleware::auth::{USER_ID_HEADER, USER_ROLE_HEADER},
    router,
};
use watchroster_core::{
    clock::FixedClock,
    config::EngineSettings,
    models::schedule::{Schedule, ScheduleRequest},
    notify::MemoryNotifier,
    store::{MemoryStore, ScheduleRepository, ShiftStore},
};

pub const ADMIN_ID: i64 = 1;

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid RFC 3339 timestamp")
}

/// "Now" for every test server: Saturday 2024-06-01, midnight UTC.
pub fn now() -> DateTime<Utc> {
    at("2024-06-01T00:00:00Z")
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<MemoryNotifier>,
    pub server: TestServer,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let state = ApiState::new(store.clone(), notifier.clone(), EngineSettings::default())
            .with_clock(Arc::new(FixedClock(now())));
        let server = TestServer::new(router(Arc::new(state))).expect("Failed to start test server");

        Self {
            store,
            notifier,
            server,
        }
    }

    pub async fn schedule(&self, name: &str, cron: &str, duration_minutes: i32) -> Schedule {
        self.store
            .insert_schedule(ScheduleRequest {
                name: name.to_string(),
                cron_pattern: cron.to_string(),
                duration_minutes,
                start_date: None,
                end_date: None,
                timezone: None,
            })
            .await
            .expect("Failed to seed schedule")
    }
}

/// A router over any store, for failure-path tests with mocks.
pub fn server_with_store(store: Arc<dyn ShiftStore>) -> TestServer {
    let state = ApiState::new(store, Arc::new(MemoryNotifier::new()), EngineSettings::default())
        .with_clock(Arc::new(FixedClock(now())));
    TestServer::new(router(Arc::new(state))).expect("Failed to start test server")
}

pub fn as_member(request: TestRequest, user_id: i64) -> TestRequest {
    request.add_header(
        HeaderName::from_static(USER_ID_HEADER),
        HeaderValue::from(user_id),
    )
}

pub fn as_admin(request: TestRequest) -> TestRequest {
    as_member(request, ADMIN_ID).add_header(
        HeaderName::from_static(USER_ROLE_HEADER),
        HeaderValue::from_static("admin"),
    )
}
