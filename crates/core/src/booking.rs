//! # Booking Validator/Writer
//!
//! Accepts a booking request, re-validates the requested instant against the
//! same boundary test the generator uses, and writes the booking. The storage
//! uniqueness constraint on `(schedule_id, shift_start)` is the only conflict
//! guard: of N concurrent requests for one occurrence, exactly one insert
//! succeeds and the rest come back as [`WatchError::Conflict`].

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::errors::{WatchError, WatchResult};
use crate::models::{
    BookingId, UserId,
    booking::{Booking, CreateBookingRequest, NewBooking},
    user::normalize_phone,
};
use crate::notify::{Notification, Notifier};
use crate::occurrence::ShiftPattern;
use crate::store::{Inserted, ShiftStore};

#[derive(Debug, Clone, Default, PartialEq)]
struct Buddy {
    user_id: Option<UserId>,
    name: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A registered member found by phone wins over the freeform name. Lookup
/// errors are logged and the freeform name is used.
async fn resolve_buddy<S>(store: &S, phone: Option<String>, name: Option<String>) -> Buddy
where
    S: ShiftStore + ?Sized,
{
    let name = non_blank(name);
    let Some(phone) = non_blank(phone).map(|p| normalize_phone(&p)) else {
        return Buddy { user_id: None, name };
    };

    match store.find_user_by_phone(phone).await {
        Ok(Some(user)) => Buddy {
            user_id: Some(user.id),
            name: Some(user.name),
        },
        Ok(None) => Buddy { user_id: None, name },
        Err(err) => {
            warn!(error = %err, "Buddy lookup failed, keeping freeform name");
            Buddy { user_id: None, name }
        }
    }
}

/// Books the occurrence of `request.schedule_id` starting at `request.shift_start`.
///
/// # Errors
///
/// * `WatchError::NotFound` - the schedule does not exist
/// * `WatchError::ShiftTimeInvalid` - the instant is outside the active range
///   or is not a fire time of the schedule's pattern
/// * `WatchError::Conflict` - the occurrence is already booked
/// * `WatchError::Database` / `WatchError::Internal` - storage failure or a
///   schedule whose stored pattern no longer parses
pub async fn create_booking<S, N>(
    store: &S,
    notifier: &N,
    user_id: UserId,
    request: CreateBookingRequest,
) -> WatchResult<Booking>
where
    S: ShiftStore + ?Sized,
    N: Notifier + ?Sized,
{
    let schedule = store
        .get_schedule(request.schedule_id)
        .await?
        .ok_or_else(|| {
            WatchError::NotFound(format!("Schedule with ID {} not found", request.schedule_id))
        })?;

    let pattern = ShiftPattern::compile(&schedule).map_err(|err| {
        warn!(schedule_id = schedule.id, error = %err, "Stored schedule cannot be evaluated");
        WatchError::Internal(err.into())
    })?;

    let start = request.shift_start;
    if !pattern.is_active_at(start) {
        return Err(WatchError::ShiftTimeInvalid(format!(
            "{start} is outside the active dates of schedule {}",
            schedule.id
        )));
    }
    if !pattern.fires_at(start) {
        return Err(WatchError::ShiftTimeInvalid(format!(
            "{start} is not a shift start of schedule {}",
            schedule.id
        )));
    }

    let buddy = resolve_buddy(store, request.buddy_phone, request.buddy_name).await;
    let new_booking = NewBooking {
        schedule_id: schedule.id,
        user_id,
        shift_start: start,
        shift_end: start + pattern.duration(),
        buddy_user_id: buddy.user_id,
        buddy_name: buddy.name,
    };

    let booking = match store.insert_booking(new_booking).await? {
        Inserted::Created(booking) => booking,
        Inserted::Duplicate => {
            return Err(WatchError::Conflict(format!(
                "Shift at {start} on schedule {} is already booked",
                schedule.id
            )));
        }
    };
    info!(
        booking_id = booking.id,
        schedule_id = booking.schedule_id,
        user_id,
        shift_start = %booking.shift_start,
        "Booking created"
    );

    // The booking stands even if the confirmation cannot be queued.
    let confirmation = Notification::BookingConfirmed {
        booking_id: booking.id,
        user_id,
        schedule_id: schedule.id,
        schedule_name: schedule.name,
        shift_start: booking.shift_start,
        shift_end: booking.shift_end,
    };
    if let Err(err) = notifier.enqueue(confirmation).await {
        warn!(booking_id = booking.id, error = %err, "Failed to enqueue booking confirmation");
    }

    Ok(booking)
}

/// Sets the attended flag. Only the booking's owner may do this; repeating
/// the same value is a no-op.
pub async fn mark_attendance<S>(
    store: &S,
    booking_id: BookingId,
    user_id: UserId,
    attended: bool,
) -> WatchResult<Booking>
where
    S: ShiftStore + ?Sized,
{
    let booking = get_booking(store, booking_id).await?;
    if booking.user_id != user_id {
        return Err(WatchError::Forbidden(format!(
            "Booking {booking_id} belongs to another member"
        )));
    }
    if booking.attended == attended {
        return Ok(booking);
    }

    store
        .set_attendance(booking_id, attended)
        .await?
        .ok_or_else(|| WatchError::NotFound(format!("Booking with ID {booking_id} not found")))
}

pub async fn get_booking<S>(store: &S, booking_id: BookingId) -> WatchResult<Booking>
where
    S: ShiftStore + ?Sized,
{
    store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| WatchError::NotFound(format!("Booking with ID {booking_id} not found")))
}

/// A member's bookings, ascending by shift start.
pub async fn list_user_bookings<S>(
    store: &S,
    user_id: UserId,
    from: Option<DateTime<Utc>>,
) -> WatchResult<Vec<Booking>>
where
    S: ShiftStore + ?Sized,
{
    Ok(store.list_bookings_for_user(user_id, from).await?)
}
