use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ScheduleId};

/// User-facing open shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub schedule_id: ScheduleId,
    pub schedule_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
}

/// Administrative view of an occurrence, annotated with its booking if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSlot {
    pub schedule_id: ScheduleId,
    pub schedule_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
    pub is_booked: bool,
    pub booking_id: Option<BookingId>,
    pub assignee_name: Option<String>,
    pub assignee_phone: Option<String>,
}

/// Query string of the slot listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}
