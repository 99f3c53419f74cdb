//! Schedule administration.
//!
//! Writes are strict: a pattern that does not parse or never fires is
//! rejected up front, as are unknown timezones and inverted date ranges.
//! Reads stay lenient because rows written before these checks existed still
//! have to list.

use chrono::Utc;
use chrono_tz::Tz;
use tracing::info;

use crate::errors::{WatchError, WatchResult};
use crate::models::{
    ScheduleId,
    schedule::{DeleteScheduleResponse, Schedule, ScheduleRequest},
    user::Actor,
};
use crate::occurrence::parse_cron;
use crate::store::ShiftStore;

pub const MAX_DURATION_MINUTES: i32 = 24 * 60;

/// Trims the request and checks every field.
pub fn validate_schedule(request: ScheduleRequest) -> WatchResult<ScheduleRequest> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(WatchError::Validation("Schedule name must not be empty".to_string()));
    }

    let cron_pattern = request.cron_pattern.trim().to_string();
    let cron = parse_cron(&cron_pattern).map_err(|e| WatchError::Validation(e.to_string()))?;
    // Impossible dates such as 30 February parse fine but never fire.
    if cron.find_next_occurrence(&Utc::now(), false).is_err() {
        return Err(WatchError::Validation(format!(
            "Cron pattern {cron_pattern:?} never fires"
        )));
    }

    if !(1..=MAX_DURATION_MINUTES).contains(&request.duration_minutes) {
        return Err(WatchError::Validation(format!(
            "Duration must be between 1 and {MAX_DURATION_MINUTES} minutes, got {}",
            request.duration_minutes
        )));
    }

    let timezone = request
        .timezone
        .map(|tz| tz.trim().to_string())
        .filter(|tz| !tz.is_empty());
    if let Some(tz) = &timezone {
        tz.parse::<Tz>()
            .map_err(|_| WatchError::Validation(format!("Unknown timezone {tz:?}")))?;
    }

    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        if end < start {
            return Err(WatchError::Validation(format!(
                "End date {end} is before start date {start}"
            )));
        }
    }

    Ok(ScheduleRequest {
        name,
        cron_pattern,
        duration_minutes: request.duration_minutes,
        start_date: request.start_date,
        end_date: request.end_date,
        timezone,
    })
}

pub async fn list_schedules<S>(store: &S) -> WatchResult<Vec<Schedule>>
where
    S: ShiftStore + ?Sized,
{
    Ok(store.list_schedules().await?)
}

pub async fn get_schedule<S>(store: &S, id: ScheduleId) -> WatchResult<Schedule>
where
    S: ShiftStore + ?Sized,
{
    store
        .get_schedule(id)
        .await?
        .ok_or_else(|| WatchError::NotFound(format!("Schedule with ID {id} not found")))
}

pub async fn create_schedule<S>(
    store: &S,
    actor: &Actor,
    request: ScheduleRequest,
) -> WatchResult<Schedule>
where
    S: ShiftStore + ?Sized,
{
    actor.require_admin()?;
    let request = validate_schedule(request)?;
    let schedule = store.insert_schedule(request).await?;
    info!(schedule_id = schedule.id, name = %schedule.name, "Schedule created");
    Ok(schedule)
}

/// Replaces a schedule's definition. Existing bookings keep their stored
/// start and end even if the new pattern no longer produces them.
pub async fn update_schedule<S>(
    store: &S,
    actor: &Actor,
    id: ScheduleId,
    request: ScheduleRequest,
) -> WatchResult<Schedule>
where
    S: ShiftStore + ?Sized,
{
    actor.require_admin()?;
    let request = validate_schedule(request)?;
    let schedule = store
        .replace_schedule(id, request)
        .await?
        .ok_or_else(|| WatchError::NotFound(format!("Schedule with ID {id} not found")))?;
    info!(schedule_id = id, "Schedule updated");
    Ok(schedule)
}

/// Deletes a schedule that no booking references, deactivating the recurring
/// assignments that point at it.
pub async fn delete_schedule<S>(
    store: &S,
    actor: &Actor,
    id: ScheduleId,
) -> WatchResult<DeleteScheduleResponse>
where
    S: ShiftStore + ?Sized,
{
    actor.require_admin()?;
    get_schedule(store, id).await?;

    let bookings = store.count_bookings_for_schedule(id).await?;
    if bookings > 0 {
        return Err(WatchError::Conflict(format!(
            "Schedule {id} has {bookings} bookings and cannot be deleted"
        )));
    }

    let deactivated_assignments = store.deactivate_assignments_for_schedule(id).await?;
    if !store.delete_schedule(id).await? {
        return Err(WatchError::NotFound(format!("Schedule with ID {id} not found")));
    }
    info!(schedule_id = id, deactivated_assignments, "Schedule deleted");

    Ok(DeleteScheduleResponse {
        id,
        deactivated_assignments,
    })
}
