pub mod booking;
pub mod notification;
pub mod recurring;
pub mod schedule;
pub mod user;
