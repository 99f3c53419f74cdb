//! Notification seam. Delivery (push, SMS) happens elsewhere; the engine only
//! enqueues, and an enqueue failure never undoes the write that triggered it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::{BookingId, ScheduleId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    BookingConfirmed {
        booking_id: BookingId,
        user_id: UserId,
        schedule_id: ScheduleId,
        schedule_name: String,
        shift_start: DateTime<Utc>,
        shift_end: DateTime<Utc>,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::BookingConfirmed { .. } => "booking_confirmed",
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn enqueue(&self, notification: Notification) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn enqueue(&self, _notification: Notification) -> Result<()> {
        Ok(())
    }
}

/// Keeps everything it is handed; for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    queued: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn queued(&self) -> Vec<Notification> {
        self.queued.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn enqueue(&self, notification: Notification) -> Result<()> {
        self.queued.lock().await.push(notification);
        Ok(())
    }
}
