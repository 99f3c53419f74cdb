#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use watchroster_core::{
    models::schedule::{Schedule, ScheduleRequest},
    store::{MemoryStore, ScheduleRepository},
};

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid RFC 3339 timestamp")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn request(name: &str, cron: &str, duration_minutes: i32) -> ScheduleRequest {
    ScheduleRequest {
        name: name.to_string(),
        cron_pattern: cron.to_string(),
        duration_minutes,
        start_date: None,
        end_date: None,
        timezone: None,
    }
}

/// Inserts straight through the repository, bypassing validation.
pub async fn seed_schedule(store: &MemoryStore, request: ScheduleRequest) -> Schedule {
    store.insert_schedule(request).await.unwrap()
}
