//! Postgres-backed implementations of the engine's storage and notification seams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use watchroster_core::{
    models::{
        booking::{Booking, NewBooking},
        recurring::{NewAssignment, RecurringAssignment},
        schedule::{Schedule, ScheduleRequest},
        user::User,
    },
    notify::{Notification, Notifier},
    store::{
        AssignmentRepository, BookingRepository, Inserted, ScheduleRepository, UserRepository,
    },
};

use crate::DbPool;
use crate::repositories::{booking, notification, recurring, schedule, user};

fn inserted<R, T>(row: Option<R>) -> Inserted<T>
where
    T: From<R>,
{
    match row {
        Some(row) => Inserted::Created(row.into()),
        None => Inserted::Duplicate,
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ScheduleRepository for PgStore {
    async fn list_schedules(&self) -> Result<Vec<Schedule>> {
        let rows = schedule::list_schedules(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_schedule(&self, id: i64) -> Result<Option<Schedule>> {
        Ok(schedule::get_schedule_by_id(&self.pool, id).await?.map(Into::into))
    }

    async fn insert_schedule(&self, request: ScheduleRequest) -> Result<Schedule> {
        Ok(schedule::create_schedule(&self.pool, &request).await?.into())
    }

    async fn replace_schedule(&self, id: i64, request: ScheduleRequest) -> Result<Option<Schedule>> {
        Ok(schedule::replace_schedule(&self.pool, id, &request)
            .await?
            .map(Into::into))
    }

    async fn delete_schedule(&self, id: i64) -> Result<bool> {
        schedule::delete_schedule(&self.pool, id)
            .await
            .wrap_err_with(|| format!("Failed to delete schedule {id}"))
    }
}

#[async_trait]
impl BookingRepository for PgStore {
    async fn find_booking(
        &self,
        schedule_id: i64,
        shift_start: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        Ok(booking::get_booking_by_occurrence(&self.pool, schedule_id, shift_start)
            .await?
            .map(Into::into))
    }

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>> {
        Ok(booking::get_booking_by_id(&self.pool, id).await?.map(Into::into))
    }

    async fn insert_booking(&self, new_booking: NewBooking) -> Result<Inserted<Booking>> {
        Ok(inserted(booking::create_booking(&self.pool, &new_booking).await?))
    }

    async fn set_attendance(&self, id: i64, attended: bool) -> Result<Option<Booking>> {
        Ok(booking::set_attendance(&self.pool, id, attended)
            .await?
            .map(Into::into))
    }

    async fn list_bookings_for_user(
        &self,
        user_id: i64,
        from: Option<DateTime<Utc>>,
    ) -> Result<Vec<Booking>> {
        let rows = booking::get_bookings_by_user_id(&self.pool, user_id, from).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_bookings_for_schedule(&self, schedule_id: i64) -> Result<i64> {
        booking::count_bookings_by_schedule_id(&self.pool, schedule_id).await
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(user::get_user_by_id(&self.pool, id).await?.map(Into::into))
    }

    async fn find_user_by_phone(&self, phone: String) -> Result<Option<User>> {
        Ok(user::get_user_by_phone(&self.pool, &phone).await?.map(Into::into))
    }
}

#[async_trait]
impl AssignmentRepository for PgStore {
    async fn list_active_assignments(&self) -> Result<Vec<RecurringAssignment>> {
        let rows = recurring::get_active_assignments(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_assignments_for_user(&self, user_id: i64) -> Result<Vec<RecurringAssignment>> {
        let rows = recurring::get_assignments_by_user_id(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_assignment(&self, id: i64) -> Result<Option<RecurringAssignment>> {
        Ok(recurring::get_assignment_by_id(&self.pool, id)
            .await?
            .map(Into::into))
    }

    async fn insert_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<Inserted<RecurringAssignment>> {
        Ok(inserted(recurring::create_assignment(&self.pool, &assignment).await?))
    }

    async fn deactivate_assignment(&self, id: i64) -> Result<Option<RecurringAssignment>> {
        Ok(recurring::deactivate_assignment(&self.pool, id)
            .await?
            .map(Into::into))
    }

    async fn deactivate_assignments_for_schedule(&self, schedule_id: i64) -> Result<u64> {
        recurring::deactivate_assignments_by_schedule_id(&self.pool, schedule_id).await
    }
}

/// Writes notifications to the outbox table for a separate delivery worker.
#[derive(Clone)]
pub struct OutboxNotifier {
    pool: DbPool,
}

impl OutboxNotifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn enqueue(&self, notification: Notification) -> Result<()> {
        let payload =
            serde_json::to_value(&notification).wrap_err("Failed to encode notification")?;
        notification::create_outbox_entry(&self.pool, notification.kind(), payload).await?;
        Ok(())
    }
}
