use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use librarium_application::{
    AccessLedger, AccessRequestQuery, AccessUnitOfWork, NotificationQuery,
    NotificationRepository, NotificationSink, PermissionLedger, RequestLedger,
};
use librarium_core::{AppError, AppResult};
use librarium_domain::{
    AccessPermission, AccessRequest, AccessRequestId, AccessRequestStatus, BookId, Notification,
    NotificationId, UserId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;


#[derive(Debug, Default)]
struct LedgerState {
    requests: HashMap<AccessRequestId, AccessRequest>,
    permissions: Vec<AccessPermission>,
    notifications: HashMap<NotificationId, Notification>,
}

/// In-memory access ledger.
///
/// Units of work are serialized by one lock and stage their writes until commit.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccessLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryAccessLedger {
    /// Creates an empty in-memory ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Unit of work over [`InMemoryAccessLedger`].
///
/// Holds the ledger lock for its whole lifetime; dropping it discards the staged writes.
struct InMemoryAccessUnitOfWork {
    state: OwnedMutexGuard<LedgerState>,
    staged_requests: HashMap<AccessRequestId, AccessRequest>,
    staged_permissions: Vec<AccessPermission>,
    staged_notifications: Vec<Notification>,
}

impl InMemoryAccessUnitOfWork {
    fn requests(&self) -> impl Iterator<Item = &AccessRequest> {
        self.state
            .requests
            .values()
            .filter(move |request| !self.staged_requests.contains_key(&request.id()))
            .chain(self.staged_requests.values())
    }

    fn permissions(&self) -> impl Iterator<Item = &AccessPermission> {
        self.state
            .permissions
            .iter()
            .chain(self.staged_permissions.iter())
    }
}

fn is_active_for(permission: &AccessPermission, user_id: UserId, book_id: BookId) -> bool {
    permission.grantee_id() == user_id && permission.book_id() == book_id && permission.is_active()
}

#[async_trait]
impl RequestLedger for InMemoryAccessUnitOfWork {
    async fn lock_pair(&mut self, _user_id: UserId, _book_id: BookId) -> AppResult<()> {
        // The ledger-wide lock is already held.
        Ok(())
    }

    async fn find_request_for_update(
        &mut self,
        request_id: AccessRequestId,
    ) -> AppResult<Option<AccessRequest>> {
        Ok(self
            .staged_requests
            .get(&request_id)
            .or_else(|| self.state.requests.get(&request_id))
            .cloned())
    }

    async fn find_pending_request(
        &mut self,
        requester_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessRequest>> {
        Ok(self
            .requests()
            .find(|request| {
                request.requester_id() == requester_id
                    && request.book_id() == book_id
                    && request.status() == AccessRequestStatus::Pending
            })
            .cloned())
    }

    async fn find_active_permission(
        &mut self,
        user_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessPermission>> {
        Ok(self
            .permissions()
            .find(|permission| is_active_for(permission, user_id, book_id))
            .cloned())
    }

    async fn save_request(&mut self, request: &AccessRequest) -> AppResult<()> {
        if request.status() == AccessRequestStatus::Pending
            && self.requests().any(|stored| {
                stored.id() != request.id()
                    && stored.requester_id() == request.requester_id()
                    && stored.book_id() == request.book_id()
                    && stored.status() == AccessRequestStatus::Pending
            })
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already has a pending request for book '{}'",
                request.requester_id(),
                request.book_id()
            )));
        }

        self.staged_requests.insert(request.id(), request.clone());
        Ok(())
    }
}

#[async_trait]
impl PermissionLedger for InMemoryAccessUnitOfWork {
    async fn save_permission(&mut self, permission: &AccessPermission) -> AppResult<()> {
        if permission.is_active()
            && self.permissions().any(|stored| {
                is_active_for(stored, permission.grantee_id(), permission.book_id())
            })
        {
            return Err(AppError::Internal(format!(
                "active permission already exists for user '{}' and book '{}'",
                permission.grantee_id(),
                permission.book_id()
            )));
        }

        self.staged_permissions.push(permission.clone());
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for InMemoryAccessUnitOfWork {
    async fn save_notification(&mut self, notification: &Notification) -> AppResult<()> {
        let already_notified = self
            .state
            .notifications
            .values()
            .chain(self.staged_notifications.iter())
            .any(|stored| stored.request_id() == notification.request_id());
        if already_notified {
            return Err(AppError::Internal(format!(
                "access request '{}' already has a notification",
                notification.request_id()
            )));
        }

        self.staged_notifications.push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl AccessUnitOfWork for InMemoryAccessUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let InMemoryAccessUnitOfWork {
            mut state,
            staged_requests,
            staged_permissions,
            staged_notifications,
        } = *self;

        debug!(
            requests = staged_requests.len(),
            permissions = staged_permissions.len(),
            notifications = staged_notifications.len(),
            "committing in-memory access unit of work"
        );

        state.requests.extend(staged_requests);
        state.permissions.extend(staged_permissions);
        state.notifications.extend(
            staged_notifications
                .into_iter()
                .map(|notification| (notification.id(), notification)),
        );

        Ok(())
    }
}

#[async_trait]
impl AccessLedger for InMemoryAccessLedger {
    async fn begin(&self) -> AppResult<Box<dyn AccessUnitOfWork>> {
        let state = Arc::clone(&self.state).lock_owned().await;

        Ok(Box::new(InMemoryAccessUnitOfWork {
            state,
            staged_requests: HashMap::new(),
            staged_permissions: Vec::new(),
            staged_notifications: Vec::new(),
        }))
    }

    async fn find_request(&self, request_id: AccessRequestId) -> AppResult<Option<AccessRequest>> {
        Ok(self.state.lock().await.requests.get(&request_id).cloned())
    }

    async fn find_active_permission(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessPermission>> {
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .iter()
            .find(|permission| is_active_for(permission, user_id, book_id))
            .cloned())
    }

    async fn list_requests(&self, query: AccessRequestQuery) -> AppResult<Vec<AccessRequest>> {
        let state = self.state.lock().await;
        let mut listed: Vec<AccessRequest> = state
            .requests
            .values()
            .filter(|request| {
                query
                    .requester_id
                    .is_none_or(|requester_id| request.requester_id() == requester_id)
                    && query.status.is_none_or(|status| request.status() == status)
            })
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            right
                .requested_at()
                .cmp(&left.requested_at())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(listed)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryAccessLedger {
    async fn list_notifications(&self, query: NotificationQuery) -> AppResult<Vec<Notification>> {
        let state = self.state.lock().await;
        let mut listed: Vec<Notification> = state
            .notifications
            .values()
            .filter(|notification| {
                notification.recipient_id() == query.recipient_id
                    && (!query.unread_only || !notification.is_read())
            })
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(listed)
    }

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.notifications.get_mut(&notification_id) else {
            return Ok(None);
        };

        stored.mark_read();
        Ok(Some(stored.clone()))
    }
}
