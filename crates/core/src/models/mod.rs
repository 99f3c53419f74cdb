pub mod booking;
pub mod recurring;
pub mod schedule;
pub mod slot;
pub mod user;

pub type ScheduleId = i64;
pub type BookingId = i64;
pub type UserId = i64;
pub type AssignmentId = i64;
