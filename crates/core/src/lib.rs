//! # Watchroster Core
//!
//! Domain types and the shift engine for the community-watch roster.
//!
//! Shift occurrences are never stored. Every listing recomputes them from the
//! schedule's cron pattern, and the only persisted claim on an occurrence is a
//! booking keyed by `(schedule_id, shift_start)`. The storage layer's
//! uniqueness constraint on that key is what keeps concurrent booking attempts
//! safe, so nothing in this crate takes a lock around storage calls.
//!
//! Components, leaf-first:
//!
//! - [`occurrence`]: derives shift instants for one schedule in a window
//! - [`availability`]: cross-references occurrences with bookings
//! - [`booking`]: validates and writes bookings, marks attendance
//! - [`materialize`]: turns recurring assignments into bookings

pub mod availability;
pub mod booking;
pub mod clock;
pub mod config;
pub mod errors;
pub mod materialize;
pub mod models;
pub mod notify;
pub mod occurrence;
pub mod schedules;
pub mod recurring;
pub mod store;
