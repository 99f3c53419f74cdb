//! # Acting User
//!
//! Accounts and sessions belong to the upstream authentication gateway. By
//! the time a request reaches this service the gateway has verified it and
//! asserts the caller's identity in two headers:
//!
//! - `x-user-id`: the caller's numeric user id (required)
//! - `x-user-role`: `admin` for administrators, anything else or absent for members

use axum::http::HeaderMap;
use watchroster_core::{errors::WatchError, models::user::Actor};

use super::error_handling::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reads the acting identity, failing with 401 when it is missing or unreadable.
pub fn acting_user(headers: &HeaderMap) -> Result<Actor, AppError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            WatchError::Authentication(format!("Missing {USER_ID_HEADER} header"))
        })?;
    let user_id = raw.trim().parse::<i64>().map_err(|_| {
        WatchError::Authentication(format!("Invalid {USER_ID_HEADER} header: {raw:?}"))
    })?;

    let is_admin = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|role| role.trim().eq_ignore_ascii_case("admin"));

    Ok(Actor { user_id, is_admin })
}

/// Like [`acting_user`], additionally requiring the admin role (403 otherwise).
pub fn acting_admin(headers: &HeaderMap) -> Result<Actor, AppError> {
    let actor = acting_user(headers)?;
    actor.require_admin()?;
    Ok(actor)
}
