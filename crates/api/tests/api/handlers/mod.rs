mod bookings_test;
mod middleware_test;
mod recurring_test;
mod schedule_test;
mod slots_test;
