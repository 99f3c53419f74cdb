//! # Recurring Materializer
//!
//! Converts standing recurring assignments into concrete bookings for the
//! unbooked occurrences they match. Each run is a bounded, self-contained
//! task over one window; it keeps no state between runs and is fired by an
//! external scheduler.
//!
//! An occurrence matches an assignment when their fingerprints agree:
//! day of week, schedule id and `HH:MM-HH:MM` time slot, all read in the
//! schedule's own timezone. When several active assignments share a
//! fingerprint, the earliest-created one (lowest id) takes the occurrence
//! and the others are skipped.
//!
//! Re-running over an overlapping window creates nothing new: every insert
//! is preceded by a fresh lookup and is in any case guarded by the booking
//! uniqueness constraint.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{Datelike, DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::availability::{list_admin_slots, lookup_booking};
use crate::clock::Clock;
use crate::errors::WatchResult;
use crate::models::{
    ScheduleId,
    booking::NewBooking,
    recurring::{RecurringAssignment, TimeSlot},
    slot::AdminSlot,
};
use crate::occurrence::Window;
use crate::store::{Inserted, ShiftStore};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub day_of_week: i16,
    pub schedule_id: ScheduleId,
    pub time_slot: String,
}

impl Fingerprint {
    /// Fingerprint of an occurrence given in absolute time and rendered in `tz`.
    pub fn of_shift(
        schedule_id: ScheduleId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: Tz,
    ) -> Self {
        let local_start = start.with_timezone(&tz);
        let local_end = end.with_timezone(&tz);
        Self {
            day_of_week: local_start.weekday().num_days_from_sunday() as i16,
            schedule_id,
            time_slot: TimeSlot::new(local_start.time(), local_end.time()).to_string(),
        }
    }

    pub fn of_slot(slot: &AdminSlot) -> Self {
        let tz = slot.timezone.parse::<Tz>().unwrap_or(Tz::UTC);
        Self::of_shift(slot.schedule_id, slot.start, slot.end, tz)
    }

    pub fn of_assignment(assignment: &RecurringAssignment) -> Self {
        Self {
            day_of_week: assignment.day_of_week,
            schedule_id: assignment.schedule_id,
            time_slot: assignment.time_slot.clone(),
        }
    }
}

/// Outcome counts of one run. `created` is the number of new bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializeReport {
    pub created: usize,
    pub already_booked: usize,
    pub unmatched: usize,
    pub failed: usize,
}

/// Winner per fingerprint: lowest assignment id.
fn index_assignments(
    mut assignments: Vec<RecurringAssignment>,
) -> HashMap<Fingerprint, RecurringAssignment> {
    assignments.sort_by_key(|a| a.id);
    let mut index: HashMap<Fingerprint, RecurringAssignment> =
        HashMap::with_capacity(assignments.len());
    for assignment in assignments.into_iter().filter(|a| a.is_active) {
        let fingerprint = Fingerprint::of_assignment(&assignment);
        match index.entry(fingerprint) {
            Entry::Occupied(winner) => debug!(
                assignment_id = assignment.id,
                winner_id = winner.get().id,
                "Assignment shadowed by an earlier one with the same slot"
            ),
            Entry::Vacant(slot) => {
                slot.insert(assignment);
            }
        }
    }
    index
}

/// Books every unbooked occurrence in `window` that an active assignment matches.
///
/// A failed insert is logged and counted, and the run moves on to the next
/// occurrence. Only failing to load assignments or schedules aborts the run.
pub async fn materialize<S>(store: &S, window: &Window, cap: usize) -> WatchResult<MaterializeReport>
where
    S: ShiftStore + ?Sized,
{
    let index = index_assignments(store.list_active_assignments().await?);
    let mut report = MaterializeReport::default();
    if index.is_empty() {
        info!(from = %window.from, to = %window.to, "No active recurring assignments");
        return Ok(report);
    }

    for slot in list_admin_slots(store, window, None, cap).await? {
        if slot.is_booked {
            report.already_booked += 1;
            continue;
        }
        let Some(assignment) = index.get(&Fingerprint::of_slot(&slot)) else {
            report.unmatched += 1;
            continue;
        };

        // A member may have booked it directly since the listing was taken.
        if lookup_booking(store, slot.schedule_id, slot.start).await.is_some() {
            report.already_booked += 1;
            continue;
        }

        let booking = NewBooking {
            schedule_id: slot.schedule_id,
            user_id: assignment.user_id,
            shift_start: slot.start,
            shift_end: slot.end,
            buddy_user_id: None,
            buddy_name: assignment.buddy_name.clone(),
        };
        match store.insert_booking(booking).await {
            Ok(Inserted::Created(booking)) => {
                debug!(
                    booking_id = booking.id,
                    assignment_id = assignment.id,
                    shift_start = %booking.shift_start,
                    "Materialized booking"
                );
                report.created += 1;
            }
            Ok(Inserted::Duplicate) => report.already_booked += 1,
            Err(err) => {
                warn!(
                    assignment_id = assignment.id,
                    schedule_id = slot.schedule_id,
                    shift_start = %slot.start,
                    error = %err,
                    "Failed to materialize booking"
                );
                report.failed += 1;
            }
        }
    }

    info!(
        from = %window.from,
        to = %window.to,
        created = report.created,
        already_booked = report.already_booked,
        unmatched = report.unmatched,
        failed = report.failed,
        "Materialization run finished"
    );
    Ok(report)
}

/// Runs [`materialize`] over `[now, now + horizon_days]`.
pub async fn materialize_upcoming<S, C>(
    store: &S,
    clock: &C,
    horizon_days: i64,
    cap: usize,
) -> WatchResult<MaterializeReport>
where
    S: ShiftStore + ?Sized,
    C: Clock + ?Sized,
{
    let now = clock.now();
    let window = Window::new(now, now + Duration::days(horizon_days))?;
    materialize(store, &window, cap).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(id: i64, user_id: i64, slot: &str) -> RecurringAssignment {
        RecurringAssignment {
            id,
            user_id,
            day_of_week: 6,
            schedule_id: 2,
            time_slot: slot.to_string(),
            buddy_name: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn fingerprint_uses_local_time() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let start: DateTime<Utc> = "2024-06-01T22:00:00Z".parse().unwrap();
        let fp = Fingerprint::of_shift(2, start, start + Duration::hours(2), tz);
        assert_eq!(fp.day_of_week, 6);
        assert_eq!(fp.time_slot, "18:00-20:00");
    }

    #[test]
    fn lowest_id_wins_a_shared_fingerprint() {
        let index = index_assignments(vec![
            assignment(9, 70, "18:00-20:00"),
            assignment(4, 40, "18:00-20:00"),
            assignment(5, 50, "20:00-22:00"),
        ]);
        assert_eq!(index.len(), 2);
        let fp = Fingerprint::of_assignment(&assignment(0, 0, "18:00-20:00"));
        assert_eq!(index[&fp].user_id, 40);
    }

    #[test]
    fn inactive_assignments_are_ignored() {
        let mut inactive = assignment(1, 10, "18:00-20:00");
        inactive.is_active = false;
        assert!(index_assignments(vec![inactive]).is_empty());
    }
}
