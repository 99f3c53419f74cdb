//! Recurring assignment administration. Assignments are soft-deleted only.

use tracing::info;

use crate::errors::{WatchError, WatchResult};
use crate::models::{
    AssignmentId, UserId,
    recurring::{CreateAssignmentRequest, NewAssignment, RecurringAssignment, TimeSlot},
    user::Actor,
};
use crate::store::{Inserted, ShiftStore};

/// Creates an assignment for the acting member, or for `request.user_id`
/// when the actor is an admin.
///
/// # Errors
///
/// * `WatchError::Validation` - day of week outside 0..=6 or malformed slot
/// * `WatchError::Forbidden` - a member creating one for someone else
/// * `WatchError::NotFound` - unknown schedule
/// * `WatchError::Conflict` - an identical active assignment exists
pub async fn create_assignment<S>(
    store: &S,
    actor: &Actor,
    request: CreateAssignmentRequest,
) -> WatchResult<RecurringAssignment>
where
    S: ShiftStore + ?Sized,
{
    let user_id = request.user_id.unwrap_or(actor.user_id);
    if !actor.can_act_for(user_id) {
        return Err(WatchError::Forbidden(
            "Members can only create their own recurring assignments".to_string(),
        ));
    }
    if !(0..=6).contains(&request.day_of_week) {
        return Err(WatchError::Validation(format!(
            "Day of week must be 0 (Sunday) to 6 (Saturday), got {}",
            request.day_of_week
        )));
    }
    let time_slot = request
        .time_slot
        .trim()
        .parse::<TimeSlot>()
        .map_err(|e| WatchError::Validation(e.to_string()))?;

    if store.get_schedule(request.schedule_id).await?.is_none() {
        return Err(WatchError::NotFound(format!(
            "Schedule with ID {} not found",
            request.schedule_id
        )));
    }

    let new_assignment = NewAssignment {
        user_id,
        day_of_week: request.day_of_week,
        schedule_id: request.schedule_id,
        time_slot: time_slot.to_string(),
        buddy_name: request
            .buddy_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    };

    match store.insert_assignment(new_assignment).await? {
        Inserted::Created(assignment) => {
            info!(
                assignment_id = assignment.id,
                user_id,
                schedule_id = assignment.schedule_id,
                time_slot = %assignment.time_slot,
                "Recurring assignment created"
            );
            Ok(assignment)
        }
        Inserted::Duplicate => Err(WatchError::Conflict(format!(
            "User {user_id} already holds {} on day {} of schedule {}",
            time_slot, request.day_of_week, request.schedule_id
        ))),
    }
}

/// Active assignments of `user_id`. Members may only list their own.
pub async fn list_assignments<S>(
    store: &S,
    actor: &Actor,
    user_id: UserId,
) -> WatchResult<Vec<RecurringAssignment>>
where
    S: ShiftStore + ?Sized,
{
    if !actor.can_act_for(user_id) {
        return Err(WatchError::Forbidden(
            "Members can only list their own recurring assignments".to_string(),
        ));
    }
    Ok(store.list_assignments_for_user(user_id).await?)
}

/// Soft-deletes an assignment. Repeating the call is harmless.
pub async fn deactivate_assignment<S>(
    store: &S,
    actor: &Actor,
    id: AssignmentId,
) -> WatchResult<RecurringAssignment>
where
    S: ShiftStore + ?Sized,
{
    let assignment = store
        .get_assignment(id)
        .await?
        .ok_or_else(|| WatchError::NotFound(format!("Recurring assignment {id} not found")))?;
    if !actor.can_act_for(assignment.user_id) {
        return Err(WatchError::Forbidden(format!(
            "Recurring assignment {id} belongs to another member"
        )));
    }
    if !assignment.is_active {
        return Ok(assignment);
    }

    let assignment = store
        .deactivate_assignment(id)
        .await?
        .ok_or_else(|| WatchError::NotFound(format!("Recurring assignment {id} not found")))?;
    info!(assignment_id = id, "Recurring assignment deactivated");
    Ok(assignment)
}
