use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::notification::Notification;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id,
            message: value.message,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}
