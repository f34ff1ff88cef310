use async_trait::async_trait;

use librarium_core::AppResult;
use librarium_domain::{Notification, NotificationId, UserId};

/// Query parameters for notification listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Recipient whose notifications are listed.
    pub recipient_id: UserId,
    /// Whether to return only unread notifications.
    pub unread_only: bool,
}

/// Repository port for reading delivered notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Lists notifications for one recipient, newest first.
    async fn list_notifications(&self, query: NotificationQuery) -> AppResult<Vec<Notification>>;

    /// Sets the read flag and returns the updated notification, if it exists.
    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>>;
}
