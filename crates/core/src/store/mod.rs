//! # Storage seam
//!
//! The engine talks to persistence only through these traits. Every method is
//! a potential suspension point and no caller holds a lock across one.
//!
//! The contract that matters most is on [`BookingRepository::insert_booking`]:
//! an implementation must enforce uniqueness of `(schedule_id, shift_start)`
//! atomically and report a violation as [`Inserted::Duplicate`] rather than as
//! an error. That single constraint is the engine's only conflict guard.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;

use crate::models::{
    AssignmentId, BookingId, ScheduleId, UserId,
    booking::{Booking, NewBooking},
    recurring::{NewAssignment, RecurringAssignment},
    schedule::{Schedule, ScheduleRequest},
    user::User,
};

pub use memory::MemoryStore;

/// Outcome of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Inserted<T> {
    Created(T),
    Duplicate,
}

impl<T> Inserted<T> {
    pub fn created(self) -> Option<T> {
        match self {
            Inserted::Created(row) => Some(row),
            Inserted::Duplicate => None,
        }
    }
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// All schedules, ascending by id.
    async fn list_schedules(&self) -> Result<Vec<Schedule>>;

    async fn get_schedule(&self, id: ScheduleId) -> Result<Option<Schedule>>;

    async fn insert_schedule(&self, request: ScheduleRequest) -> Result<Schedule>;

    /// Replaces the definition; `None` if the schedule does not exist.
    async fn replace_schedule(
        &self,
        id: ScheduleId,
        request: ScheduleRequest,
    ) -> Result<Option<Schedule>>;

    /// `false` if there was nothing to delete.
    async fn delete_schedule(&self, id: ScheduleId) -> Result<bool>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Point lookup on the unique key.
    async fn find_booking(
        &self,
        schedule_id: ScheduleId,
        shift_start: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    async fn get_booking(&self, id: BookingId) -> Result<Option<Booking>>;

    async fn insert_booking(&self, booking: NewBooking) -> Result<Inserted<Booking>>;

    async fn set_attendance(&self, id: BookingId, attended: bool) -> Result<Option<Booking>>;

    /// Ascending by shift start, optionally only shifts starting at or after `from`.
    async fn list_bookings_for_user(
        &self,
        user_id: UserId,
        from: Option<DateTime<Utc>>,
    ) -> Result<Vec<Booking>>;

    async fn count_bookings_for_schedule(&self, schedule_id: ScheduleId) -> Result<i64>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// `phone` is already normalized by the caller.
    async fn find_user_by_phone(&self, phone: String) -> Result<Option<User>>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn list_active_assignments(&self) -> Result<Vec<RecurringAssignment>>;

    async fn list_assignments_for_user(&self, user_id: UserId) -> Result<Vec<RecurringAssignment>>;

    async fn get_assignment(&self, id: AssignmentId) -> Result<Option<RecurringAssignment>>;

    /// Uniqueness among active rows on (user, day, schedule, slot).
    async fn insert_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<Inserted<RecurringAssignment>>;

    /// Clears the active flag. Returns the row whether or not it was already inactive.
    async fn deactivate_assignment(&self, id: AssignmentId) -> Result<Option<RecurringAssignment>>;

    async fn deactivate_assignments_for_schedule(&self, schedule_id: ScheduleId) -> Result<u64>;
}

/// Everything the engine needs from persistence.
pub trait ShiftStore:
    ScheduleRepository + BookingRepository + UserRepository + AssignmentRepository
{
}

impl<T> ShiftStore for T where
    T: ScheduleRepository + BookingRepository + UserRepository + AssignmentRepository + ?Sized
{
}
