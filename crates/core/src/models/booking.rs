use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ScheduleId, UserId};

/// A persisted claim by one user on exactly one occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub schedule_id: ScheduleId,
    pub user_id: UserId,
    pub shift_start: DateTime<Utc>,
    pub shift_end: DateTime<Utc>,
    pub buddy_user_id: Option<UserId>,
    pub buddy_name: Option<String>,
    pub attended: bool,
    pub created_at: DateTime<Utc>,
}

/// Row handed to [`crate::store::BookingRepository::insert_booking`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub schedule_id: ScheduleId,
    pub user_id: UserId,
    pub shift_start: DateTime<Utc>,
    pub shift_end: DateTime<Utc>,
    pub buddy_user_id: Option<UserId>,
    pub buddy_name: Option<String>,
}

/// The caller never supplies a shift end; it is derived from the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub schedule_id: ScheduleId,
    pub shift_start: DateTime<Utc>,
    #[serde(default)]
    pub buddy_phone: Option<String>,
    #[serde(default)]
    pub buddy_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub attended: bool,
}
