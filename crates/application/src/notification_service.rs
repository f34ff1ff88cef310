use std::sync::Arc;

use librarium_core::{AppError, AppResult};
use librarium_domain::{Notification, NotificationId, UserId};

use crate::access_ports::{IdentityStore, NotificationQuery, NotificationRepository};


/// Application service for reading and acknowledging request outcome notifications.
#[derive(Clone)]
pub struct NotificationService {
    identity_store: Arc<dyn IdentityStore>,
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        repository: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            identity_store,
            repository,
        }
    }

    /// Lists a user's notifications, newest first.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> AppResult<Vec<Notification>> {
        if self.identity_store.find_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        self.repository
            .list_notifications(NotificationQuery {
                recipient_id: user_id,
                unread_only,
            })
            .await
    }

    /// Marks a notification as read. Marking it again is a no-op.
    pub async fn mark_read(&self, notification_id: NotificationId) -> AppResult<Notification> {
        self.repository
            .mark_notification_read(notification_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("notification '{notification_id}' was not found"))
            })
    }
}
