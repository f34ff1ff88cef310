use chrono::{DateTime, Utc};
use librarium_domain::Notification;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string for notification listings.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    pub unread_only: Option<bool>,
}

/// API representation of a notification.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub request_id: Uuid,
    pub message: String,
    pub notification_type: &'static str,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        Self {
            notification_id: value.id().as_uuid(),
            user_id: value.recipient_id().as_uuid(),
            request_id: value.request_id().as_uuid(),
            message: value.message().to_owned(),
            notification_type: value.notification_type().as_str(),
            is_read: value.is_read(),
            created_at: value.created_at(),
        }
    }
}
