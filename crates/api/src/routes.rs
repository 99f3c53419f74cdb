pub mod bookings;
pub mod health;
pub mod recurring;
pub mod schedule;
pub mod slots;
