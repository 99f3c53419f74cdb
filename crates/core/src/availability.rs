//! # Availability Filter
//!
//! Cross-references generated occurrences with persisted bookings. Two views:
//!
//! - **available-only**: open shifts for members, ascending by start
//! - **admin-all**: every occurrence, annotated with its booking and assignee
//!
//! A booking lookup that fails for any reason other than "no such booking" is
//! logged and the occurrence is treated as unbooked. A storage hiccup then
//! costs completeness of the listing rather than the whole request; the
//! booking writer's uniqueness check still stops a double booking.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::config::EngineSettings;
use crate::errors::{WatchError, WatchResult};
use crate::models::{
    ScheduleId,
    booking::Booking,
    slot::{AdminSlot, AvailableSlot, SlotQuery},
};
use crate::occurrence::{Occurrence, ShiftPattern, Window, compile_schedules};
use crate::store::ShiftStore;

/// Fills in the defaults of a listing query and bounds its window.
///
/// `from` defaults to `now`, `to` to `from` plus the default window, and
/// `limit` to the default limit. A window wider than the configured maximum
/// is rejected rather than silently clipped.
pub fn resolve_query(
    query: &SlotQuery,
    now: DateTime<Utc>,
    settings: &EngineSettings,
) -> WatchResult<(Window, usize)> {
    let from = query.from.unwrap_or(now);
    let to = query
        .to
        .unwrap_or_else(|| from + Duration::days(settings.default_window_days));
    let window = Window::new(from, to)?;

    if window.to - window.from > Duration::days(settings.max_window_days) {
        return Err(WatchError::Validation(format!(
            "Window may span at most {} days",
            settings.max_window_days
        )));
    }

    Ok((window, query.limit.unwrap_or(settings.default_limit)))
}

/// Point lookup on `(schedule_id, start)`, failing open.
pub async fn lookup_booking<S>(
    store: &S,
    schedule_id: ScheduleId,
    start: DateTime<Utc>,
) -> Option<Booking>
where
    S: ShiftStore + ?Sized,
{
    match store.find_booking(schedule_id, start).await {
        Ok(found) => found,
        Err(err) => {
            warn!(
                schedule_id,
                shift_start = %start,
                error = %err,
                "Booking lookup failed, treating occurrence as unbooked"
            );
            None
        }
    }
}

fn note_cap(pattern: &ShiftPattern, enumerated: usize, cap: usize) {
    if enumerated >= cap {
        warn!(
            schedule_id = pattern.schedule_id(),
            cap, "Occurrence cap reached, listing for this schedule is truncated"
        );
    }
}

fn sort_and_truncate<T>(
    items: &mut Vec<T>,
    limit: Option<usize>,
    key: impl Fn(&T) -> (DateTime<Utc>, ScheduleId),
) {
    items.sort_by_key(|item| key(item));
    if let Some(limit) = limit {
        items.truncate(limit);
    }
}

/// Open shifts in `window`, ascending by start, at most `limit` of them.
///
/// Each schedule's occurrences are drained lazily and only until that
/// schedule has contributed `limit` open shifts, so the number of booking
/// lookups is bounded by `schedules × limit` and `cap`.
pub async fn list_available_slots<S>(
    store: &S,
    window: &Window,
    limit: Option<usize>,
    cap: usize,
) -> WatchResult<Vec<AvailableSlot>>
where
    S: ShiftStore + ?Sized,
{
    let schedules = compile_schedules(store.list_schedules().await?);
    let mut slots = Vec::new();

    for (schedule, pattern) in &schedules {
        let mut open = 0;
        let mut enumerated = 0;
        for occurrence in pattern.occurrences(window).take(cap) {
            enumerated += 1;
            if lookup_booking(store, occurrence.schedule_id, occurrence.start)
                .await
                .is_some()
            {
                continue;
            }
            slots.push(available(&schedule.name, occurrence));
            open += 1;
            if limit.is_some_and(|limit| open >= limit) {
                break;
            }
        }
        note_cap(pattern, enumerated, cap);
    }

    sort_and_truncate(&mut slots, limit, |s| (s.start, s.schedule_id));
    debug!(count = slots.len(), from = %window.from, to = %window.to, "Listed available slots");
    Ok(slots)
}

/// Every occurrence in `window`, ascending by start, at most `limit` of them,
/// with booking id and assignee identity attached where booked.
pub async fn list_admin_slots<S>(
    store: &S,
    window: &Window,
    limit: Option<usize>,
    cap: usize,
) -> WatchResult<Vec<AdminSlot>>
where
    S: ShiftStore + ?Sized,
{
    let schedules = compile_schedules(store.list_schedules().await?);
    let per_schedule = limit.map_or(cap, |limit| limit.min(cap));

    let mut occurrences: Vec<(&str, Occurrence)> = Vec::new();
    for (schedule, pattern) in &schedules {
        let before = occurrences.len();
        occurrences.extend(
            pattern
                .occurrences(window)
                .take(per_schedule)
                .map(|o| (schedule.name.as_str(), o)),
        );
        note_cap(pattern, occurrences.len() - before, cap);
    }
    sort_and_truncate(&mut occurrences, limit, |(_, o)| (o.start, o.schedule_id));

    let mut slots = Vec::with_capacity(occurrences.len());
    for (name, occurrence) in occurrences {
        let booking = lookup_booking(store, occurrence.schedule_id, occurrence.start).await;
        slots.push(annotate(store, name, occurrence, booking).await);
    }

    debug!(count = slots.len(), from = %window.from, to = %window.to, "Listed admin slots");
    Ok(slots)
}

fn available(schedule_name: &str, occurrence: Occurrence) -> AvailableSlot {
    AvailableSlot {
        schedule_id: occurrence.schedule_id,
        schedule_name: schedule_name.to_string(),
        start: occurrence.start,
        end: occurrence.end,
        timezone: occurrence.timezone,
    }
}

async fn annotate<S>(
    store: &S,
    schedule_name: &str,
    occurrence: Occurrence,
    booking: Option<Booking>,
) -> AdminSlot
where
    S: ShiftStore + ?Sized,
{
    let mut slot = AdminSlot {
        schedule_id: occurrence.schedule_id,
        schedule_name: schedule_name.to_string(),
        start: occurrence.start,
        end: occurrence.end,
        timezone: occurrence.timezone,
        is_booked: booking.is_some(),
        booking_id: booking.as_ref().map(|b| b.id),
        assignee_name: None,
        assignee_phone: None,
    };

    if let Some(booking) = booking {
        match store.get_user(booking.user_id).await {
            Ok(Some(user)) => {
                slot.assignee_name = Some(user.name);
                slot.assignee_phone = user.phone;
            }
            Ok(None) => {}
            Err(err) => warn!(
                booking_id = booking.id,
                user_id = booking.user_id,
                error = %err,
                "Could not resolve assignee"
            ),
        }
    }

    slot
}
