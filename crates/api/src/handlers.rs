pub mod admin;
pub mod bookings;
pub mod recurring;
pub mod schedule;
pub mod slots;
