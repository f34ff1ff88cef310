use std::str::FromStr;

use chrono::{DateTime, Utc};
use librarium_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AccessRequest, AccessRequestId, AccessRequestStatus, UserId};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random notification identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a notification identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Outcome carried by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// The request was approved.
    Approval,
    /// The request was rejected.
    Rejection,
}

impl NotificationType {
    /// Returns the storage string for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approval => "approval",
            Self::Rejection => "rejection",
        }
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "approval" => Ok(Self::Approval),
            "rejection" => Ok(Self::Rejection),
            _ => Err(AppError::Validation(format!(
                "unknown notification type '{value}'"
            ))),
        }
    }
}

/// Message delivered to a requester once their request is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    id: NotificationId,
    recipient_id: UserId,
    request_id: AccessRequestId,
    message: String,
    notification_type: NotificationType,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Composes the outcome notification for a processed request.
    ///
    /// Fails with `InvalidState` for requests that are still pending.
    pub fn for_processed_request(
        request: &AccessRequest,
        book_title: &str,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let (notification_type, message) = match request.status() {
            AccessRequestStatus::Approved => (
                NotificationType::Approval,
                format!("Your request to access {book_title} has been approved."),
            ),
            AccessRequestStatus::Rejected => (
                NotificationType::Rejection,
                format!(
                    "Your request to access {book_title} has been rejected: {}",
                    request.rejection_reason().unwrap_or_default()
                ),
            ),
            AccessRequestStatus::Pending => {
                return Err(AppError::InvalidState(format!(
                    "access request '{}' has not been processed",
                    request.id()
                )));
            }
        };

        Ok(Self {
            id: NotificationId::new(),
            recipient_id: request.requester_id(),
            request_id: request.id(),
            message,
            notification_type,
            is_read: false,
            created_at,
        })
    }

    /// Rehydrates a stored notification.
    #[must_use]
    pub fn restore(
        id: NotificationId,
        recipient_id: UserId,
        request_id: AccessRequestId,
        message: String,
        notification_type: NotificationType,
        is_read: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            recipient_id,
            request_id,
            message,
            notification_type,
            is_read,
            created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the recipient.
    #[must_use]
    pub fn recipient_id(&self) -> UserId {
        self.recipient_id
    }

    /// Returns the originating request.
    #[must_use]
    pub fn request_id(&self) -> AccessRequestId {
        self.request_id
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the outcome type.
    #[must_use]
    pub fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    /// Returns whether the recipient has read the message.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.is_read
    }

    /// Records the read receipt. Idempotent.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessDecision, BookId};

    fn processed(decision: AccessDecision) -> AccessRequest {
        let mut request = AccessRequest::submit(UserId::new(), BookId::new(), "", Utc::now());
        assert!(request.decide(decision, UserId::new(), Utc::now()).is_ok());
        request
    }

    #[test]
    fn approval_message_names_the_book() {
        let request = processed(AccessDecision::Approve);

        let notification = Notification::for_processed_request(&request, "Dune", Utc::now())
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(notification.notification_type(), NotificationType::Approval);
        assert_eq!(
            notification.message(),
            "Your request to access Dune has been approved."
        );
        assert_eq!(notification.recipient_id(), request.requester_id());
        assert_eq!(notification.request_id(), request.id());
        assert!(!notification.is_read());
    }

    #[test]
    fn rejection_message_ends_with_reason() {
        let request = processed(AccessDecision::Reject {
            reason: "insufficient justification".to_owned(),
        });

        let notification = Notification::for_processed_request(&request, "Dune", Utc::now())
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(notification.notification_type(), NotificationType::Rejection);
        assert_eq!(
            notification.message(),
            "Your request to access Dune has been rejected: insufficient justification"
        );
    }

    #[test]
    fn pending_request_has_no_notification() {
        let request = AccessRequest::submit(UserId::new(), BookId::new(), "", Utc::now());

        let result = Notification::for_processed_request(&request, "Dune", Utc::now());

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }
}
