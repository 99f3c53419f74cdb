use serde::{Deserialize, Serialize};

use super::UserId;
use crate::errors::{WatchError, WatchResult};

/// Registered member as seen by the shift engine. Accounts themselves are
/// owned by the authentication service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub phone: Option<String>,
}

/// Identity on whose behalf an operation runs, as asserted by the
/// authentication gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Actor {
    pub fn member(user_id: UserId) -> Self {
        Self { user_id, is_admin: false }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self { user_id, is_admin: true }
    }

    pub fn require_admin(&self) -> WatchResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(WatchError::Forbidden("Administrator role required".to_string()))
        }
    }

    /// Members act for themselves; admins for anyone.
    pub fn can_act_for(&self, user_id: UserId) -> bool {
        self.is_admin || self.user_id == user_id
    }
}

/// Strips formatting characters so "+1 (555) 010-2030" and "+15550102030"
/// compare equal.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')' | '.'))
        .collect()
}
