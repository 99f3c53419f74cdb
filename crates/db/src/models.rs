use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use watchroster_core::models::{
    booking::Booking, recurring::RecurringAssignment, schedule::Schedule, user::User,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSchedule {
    pub id: i64,
    pub name: String,
    pub cron_pattern: String,
    pub duration_minutes: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: i64,
    pub schedule_id: i64,
    pub user_id: i64,
    pub shift_start: DateTime<Utc>,
    pub shift_end: DateTime<Utc>,
    pub buddy_user_id: Option<i64>,
    pub buddy_name: Option<String>,
    pub attended: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAssignment {
    pub id: i64,
    pub user_id: i64,
    pub day_of_week: i16,
    pub schedule_id: i64,
    pub time_slot: String,
    pub buddy_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOutboxEntry {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<DbSchedule> for Schedule {
    fn from(row: DbSchedule) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cron_pattern: row.cron_pattern,
            duration_minutes: row.duration_minutes,
            start_date: row.start_date,
            end_date: row.end_date,
            timezone: row.timezone,
            created_at: row.created_at,
        }
    }
}

impl From<DbBooking> for Booking {
    fn from(row: DbBooking) -> Self {
        Self {
            id: row.id,
            schedule_id: row.schedule_id,
            user_id: row.user_id,
            shift_start: row.shift_start,
            shift_end: row.shift_end,
            buddy_user_id: row.buddy_user_id,
            buddy_name: row.buddy_name,
            attended: row.attended,
            created_at: row.created_at,
        }
    }
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
        }
    }
}

impl From<DbAssignment> for RecurringAssignment {
    fn from(row: DbAssignment) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            day_of_week: row.day_of_week,
            schedule_id: row.schedule_id,
            time_slot: row.time_slot,
            buddy_name: row.buddy_name,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}
