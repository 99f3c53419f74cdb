//! In-process store with the same uniqueness rules as the relational schema.
//!
//! Each write takes the table lock once and checks the unique key inside that
//! critical section, which gives the same all-or-nothing behaviour as the
//! database constraint for concurrent callers.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use tokio::sync::RwLock;

use super::{
    AssignmentRepository, BookingRepository, Inserted, ScheduleRepository, UserRepository,
};
use crate::models::{
    AssignmentId, BookingId, ScheduleId, UserId,
    booking::{Booking, NewBooking},
    recurring::{NewAssignment, RecurringAssignment},
    schedule::{Schedule, ScheduleRequest},
    user::{User, normalize_phone},
};

type AssignmentKey = (UserId, i16, ScheduleId, String);

#[derive(Default)]
struct Tables {
    schedules: BTreeMap<ScheduleId, Schedule>,
    bookings: BTreeMap<BookingId, Booking>,
    booking_keys: HashMap<(ScheduleId, DateTime<Utc>), BookingId>,
    users: BTreeMap<UserId, User>,
    assignments: BTreeMap<AssignmentId, RecurringAssignment>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn assignment_key(a: &RecurringAssignment) -> AssignmentKey {
    (a.user_id, a.day_of_week, a.schedule_id, a.time_slot.clone())
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a member; stands in for the authentication service.
    pub async fn add_user(&self, name: &str, phone: Option<&str>) -> User {
        let mut tables = self.tables.write().await;
        let user = User {
            id: tables.next_id(),
            name: name.to_string(),
            phone: phone.map(normalize_phone),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub async fn all_bookings(&self) -> Vec<Booking> {
        self.tables.read().await.bookings.values().cloned().collect()
    }
}

#[async_trait]
impl ScheduleRepository for MemoryStore {
    async fn list_schedules(&self) -> Result<Vec<Schedule>> {
        Ok(self.tables.read().await.schedules.values().cloned().collect())
    }

    async fn get_schedule(&self, id: ScheduleId) -> Result<Option<Schedule>> {
        Ok(self.tables.read().await.schedules.get(&id).cloned())
    }

    async fn insert_schedule(&self, request: ScheduleRequest) -> Result<Schedule> {
        let mut tables = self.tables.write().await;
        let schedule = Schedule {
            id: tables.next_id(),
            name: request.name,
            cron_pattern: request.cron_pattern,
            duration_minutes: request.duration_minutes,
            start_date: request.start_date,
            end_date: request.end_date,
            timezone: request.timezone,
            created_at: Utc::now(),
        };
        tables.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn replace_schedule(
        &self,
        id: ScheduleId,
        request: ScheduleRequest,
    ) -> Result<Option<Schedule>> {
        let mut tables = self.tables.write().await;
        let Some(schedule) = tables.schedules.get_mut(&id) else {
            return Ok(None);
        };
        schedule.name = request.name;
        schedule.cron_pattern = request.cron_pattern;
        schedule.duration_minutes = request.duration_minutes;
        schedule.start_date = request.start_date;
        schedule.end_date = request.end_date;
        schedule.timezone = request.timezone;
        Ok(Some(schedule.clone()))
    }

    async fn delete_schedule(&self, id: ScheduleId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.bookings.values().any(|b| b.schedule_id == id) {
            eyre::bail!("schedule {id} is still referenced by bookings");
        }
        Ok(tables.schedules.remove(&id).is_some())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn find_booking(
        &self,
        schedule_id: ScheduleId,
        shift_start: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let tables = self.tables.read().await;
        Ok(tables
            .booking_keys
            .get(&(schedule_id, shift_start))
            .and_then(|id| tables.bookings.get(id))
            .cloned())
    }

    async fn get_booking(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<Inserted<Booking>> {
        let mut tables = self.tables.write().await;
        let key = (booking.schedule_id, booking.shift_start);
        if tables.booking_keys.contains_key(&key) {
            return Ok(Inserted::Duplicate);
        }
        if !tables.schedules.contains_key(&booking.schedule_id) {
            eyre::bail!("schedule {} does not exist", booking.schedule_id);
        }
        let row = Booking {
            id: tables.next_id(),
            schedule_id: booking.schedule_id,
            user_id: booking.user_id,
            shift_start: booking.shift_start,
            shift_end: booking.shift_end,
            buddy_user_id: booking.buddy_user_id,
            buddy_name: booking.buddy_name,
            attended: false,
            created_at: Utc::now(),
        };
        tables.booking_keys.insert(key, row.id);
        tables.bookings.insert(row.id, row.clone());
        Ok(Inserted::Created(row))
    }

    async fn set_attendance(&self, id: BookingId, attended: bool) -> Result<Option<Booking>> {
        let mut tables = self.tables.write().await;
        Ok(tables.bookings.get_mut(&id).map(|booking| {
            booking.attended = attended;
            booking.clone()
        }))
    }

    async fn list_bookings_for_user(
        &self,
        user_id: UserId,
        from: Option<DateTime<Utc>>,
    ) -> Result<Vec<Booking>> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .filter(|b| from.is_none_or(|from| b.shift_start >= from))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.shift_start, b.id));
        Ok(bookings)
    }

    async fn count_bookings_for_schedule(&self, schedule_id: ScheduleId) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .values()
            .filter(|b| b.schedule_id == schedule_id)
            .count() as i64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_phone(&self, phone: String) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.phone.as_deref() == Some(phone.as_str()))
            .cloned())
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn list_active_assignments(&self) -> Result<Vec<RecurringAssignment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .values()
            .filter(|a| a.is_active)
            .cloned()
            .collect())
    }

    async fn list_assignments_for_user(&self, user_id: UserId) -> Result<Vec<RecurringAssignment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .values()
            .filter(|a| a.is_active && a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_assignment(&self, id: AssignmentId) -> Result<Option<RecurringAssignment>> {
        Ok(self.tables.read().await.assignments.get(&id).cloned())
    }

    async fn insert_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<Inserted<RecurringAssignment>> {
        let mut tables = self.tables.write().await;
        let key: AssignmentKey = (
            assignment.user_id,
            assignment.day_of_week,
            assignment.schedule_id,
            assignment.time_slot.clone(),
        );
        let taken = tables
            .assignments
            .values()
            .any(|a| a.is_active && assignment_key(a) == key);
        if taken {
            return Ok(Inserted::Duplicate);
        }
        let row = RecurringAssignment {
            id: tables.next_id(),
            user_id: assignment.user_id,
            day_of_week: assignment.day_of_week,
            schedule_id: assignment.schedule_id,
            time_slot: assignment.time_slot,
            buddy_name: assignment.buddy_name,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.assignments.insert(row.id, row.clone());
        Ok(Inserted::Created(row))
    }

    async fn deactivate_assignment(&self, id: AssignmentId) -> Result<Option<RecurringAssignment>> {
        let mut tables = self.tables.write().await;
        Ok(tables.assignments.get_mut(&id).map(|a| {
            a.is_active = false;
            a.clone()
        }))
    }

    async fn deactivate_assignments_for_schedule(&self, schedule_id: ScheduleId) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let mut count = 0;
        for a in tables.assignments.values_mut() {
            if a.is_active && a.schedule_id == schedule_id {
                a.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }
}
