//! Notification model.
//!
//! Notifications form an append-only log: one record per delivery
//! attempt, created as a side effect of a lifecycle transition or an
//! explicit resend, never mutated afterward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery status recorded at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Sent,
    Delivered,
    Failed,
}

/// Notification entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub file_id: Uuid,
    pub student_id: String,
    pub token: String,
    pub message: String,
    pub sent_date: DateTime<Utc>,
    pub status: NotificationStatus,
}

/// Payload for appending a notification record
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub file_id: Uuid,
    pub student_id: String,
    pub token: String,
    pub message: String,
    pub status: NotificationStatus,
}
