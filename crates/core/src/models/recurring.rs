use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssignmentId, ScheduleId, UserId};

/// Standing rule that converts matching future occurrences into bookings.
///
/// `day_of_week` counts from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringAssignment {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub day_of_week: i16,
    pub schedule_id: ScheduleId,
    pub time_slot: String,
    pub buddy_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub user_id: UserId,
    pub day_of_week: i16,
    pub schedule_id: ScheduleId,
    pub time_slot: String,
    pub buddy_name: Option<String>,
}

/// `user_id` defaults to the acting user; only admins may set someone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub day_of_week: i16,
    pub schedule_id: ScheduleId,
    pub time_slot: String,
    #[serde(default)]
    pub buddy_name: Option<String>,
}

/// Local wall-clock span rendered as `HH:MM-HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("time slot must look like HH:MM-HH:MM, got {0:?}")]
pub struct TimeSlotParseError(pub String);

impl FromStr for TimeSlot {
    type Err = TimeSlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeSlotParseError(s.to_string());
        let (start, end) = s.split_once('-').ok_or_else(err)?;
        // Zero-padded only, so the stored string always equals the rendered fingerprint.
        if start.len() != 5 || end.len() != 5 {
            return Err(err());
        }
        let start = NaiveTime::parse_from_str(start, "%H:%M").map_err(|_| err())?;
        let end = NaiveTime::parse_from_str(end, "%H:%M").map_err(|_| err())?;
        Ok(Self { start, end })
    }
}
