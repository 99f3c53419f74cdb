use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ScheduleId;

/// A named recurring shift definition.
///
/// `timezone` is stored as given and treated as untrusted when read back;
/// see [`crate::occurrence::resolve_timezone`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub cron_pattern: String,
    pub duration_minutes: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of both schedule creation and full replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub name: String,
    pub cron_pattern: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteScheduleResponse {
    pub id: ScheduleId,
    pub deactivated_assignments: u64,
}
