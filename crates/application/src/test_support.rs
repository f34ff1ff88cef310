use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use librarium_core::{AppError, AppResult};
use librarium_domain::{
    AccessPermission, AccessRequest, AccessRequestId, AccessRequestStatus, Book, BookId,
    Notification, NotificationId, UserAccount, UserId, UserRole,
};

use crate::access_ports::{
    AccessLedger, AccessRequestQuery, AccessUnitOfWork, IdentityStore, NotificationQuery,
    NotificationRepository, NotificationSink, PermissionLedger, RequestLedger,
};
use crate::{AccessWorkflowService, NotificationService};

pub(crate) const BOOK_TITLE: &str = "Dune";

/// Identity lookups that share one storage handle with the fake ledger.
///
/// A lookup made while a unit of work holds that handle fails as an aborted
/// transaction, the way a pool with no free connection times out.
#[derive(Default)]
pub(crate) struct FakeIdentityStore {
    users: HashMap<UserId, UserAccount>,
    books: HashMap<BookId, Book>,
    shared_handle: Option<Arc<Mutex<LedgerSnapshot>>>,
}

impl FakeIdentityStore {
    fn ensure_handle_free(&self) -> AppResult<()> {
        match &self.shared_handle {
            Some(handle) if handle.try_lock().is_err() => Err(AppError::TransactionAborted(
                "pool timed out while waiting for an open connection".to_owned(),
            )),
            _ => Ok(()),
        }
    }

    fn add_user(&mut self, username: &str, role: UserRole) -> UserId {
        let user_id = UserId::new();
        let account = UserAccount::new(user_id, username, username, None, role)
            .unwrap_or_else(|_| unreachable!());
        self.users.insert(user_id, account);
        user_id
    }

    fn add_book(&mut self, title: &str) -> BookId {
        let book_id = BookId::new();
        let book = Book::new(book_id, title, "Frank Herbert", "", None)
            .unwrap_or_else(|_| unreachable!());
        self.books.insert(book_id, book);
        book_id
    }
}

#[async_trait]
impl IdentityStore for FakeIdentityStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        self.ensure_handle_free()?;
        Ok(self.users.get(&user_id).cloned())
    }

    async fn find_book(&self, book_id: BookId) -> AppResult<Option<Book>> {
        self.ensure_handle_free()?;
        Ok(self.books.get(&book_id).cloned())
    }
}

/// Committed ledger contents.
#[derive(Debug, Clone, Default)]
pub(crate) struct LedgerSnapshot {
    pub(crate) requests: Vec<AccessRequest>,
    pub(crate) permissions: Vec<AccessPermission>,
    pub(crate) notifications: Vec<Notification>,
}

/// Writes that the fake ledger refuses, to exercise rollback.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailurePlan {
    pub(crate) notification_write: bool,
    pub(crate) commit: bool,
}

#[derive(Default)]
pub(crate) struct FakeAccessLedger {
    state: Arc<Mutex<LedgerSnapshot>>,
    failures: FailurePlan,
}

impl FakeAccessLedger {
    pub(crate) fn failing(failures: FailurePlan) -> Self {
        Self {
            state: Arc::default(),
            failures,
        }
    }

    pub(crate) async fn snapshot(&self) -> LedgerSnapshot {
        self.state.lock().await.clone()
    }

    pub(crate) async fn seed_permission(&self, permission: AccessPermission) {
        self.state.lock().await.permissions.push(permission);
    }
}

struct FakeUnitOfWork {
    staged: LedgerSnapshot,
    committed: OwnedMutexGuard<LedgerSnapshot>,
    failures: FailurePlan,
}

#[async_trait]
impl RequestLedger for FakeUnitOfWork {
    async fn lock_pair(&mut self, _user_id: UserId, _book_id: BookId) -> AppResult<()> {
        Ok(())
    }

    async fn find_request_for_update(
        &mut self,
        request_id: AccessRequestId,
    ) -> AppResult<Option<AccessRequest>> {
        Ok(self
            .staged
            .requests
            .iter()
            .find(|request| request.id() == request_id)
            .cloned())
    }

    async fn find_pending_request(
        &mut self,
        requester_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessRequest>> {
        Ok(self
            .staged
            .requests
            .iter()
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
            .staged
            .permissions
            .iter()
            .find(|permission| {
                permission.grantee_id() == user_id
                    && permission.book_id() == book_id
                    && permission.is_active()
            })
            .cloned())
    }

    async fn save_request(&mut self, request: &AccessRequest) -> AppResult<()> {
        match self
            .staged
            .requests
            .iter_mut()
            .find(|stored| stored.id() == request.id())
        {
            Some(stored) => *stored = request.clone(),
            None => self.staged.requests.push(request.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl PermissionLedger for FakeUnitOfWork {
    async fn save_permission(&mut self, permission: &AccessPermission) -> AppResult<()> {
        self.staged.permissions.push(permission.clone());
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for FakeUnitOfWork {
    async fn save_notification(&mut self, notification: &Notification) -> AppResult<()> {
        if self.failures.notification_write {
            return Err(AppError::Internal(
                "notification store unavailable".to_owned(),
            ));
        }

        self.staged.notifications.push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl AccessUnitOfWork for FakeUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        if self.failures.commit {
            return Err(AppError::TransactionAborted(
                "could not serialize access".to_owned(),
            ));
        }

        let FakeUnitOfWork {
            staged,
            mut committed,
            ..
        } = *self;
        *committed = staged;
        Ok(())
    }
}

#[async_trait]
impl AccessLedger for FakeAccessLedger {
    async fn begin(&self) -> AppResult<Box<dyn AccessUnitOfWork>> {
        let committed = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(FakeUnitOfWork {
            staged: committed.clone(),
            committed,
            failures: self.failures,
        }))
    }

    async fn find_request(&self, request_id: AccessRequestId) -> AppResult<Option<AccessRequest>> {
        Ok(self
            .state
            .lock()
            .await
            .requests
            .iter()
            .find(|request| request.id() == request_id)
            .cloned())
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
            .find(|permission| {
                permission.grantee_id() == user_id
                    && permission.book_id() == book_id
                    && permission.is_active()
            })
            .cloned())
    }

    async fn list_requests(&self, query: AccessRequestQuery) -> AppResult<Vec<AccessRequest>> {
        let mut listed: Vec<AccessRequest> = self
            .state
            .lock()
            .await
            .requests
            .iter()
            .filter(|request| {
                query
                    .requester_id
                    .is_none_or(|requester_id| request.requester_id() == requester_id)
                    && query.status.is_none_or(|status| request.status() == status)
            })
            .cloned()
            .collect();
        listed.sort_by_key(|request| std::cmp::Reverse(request.requested_at()));
        Ok(listed)
    }
}

#[async_trait]
impl NotificationRepository for FakeAccessLedger {
    async fn list_notifications(&self, query: NotificationQuery) -> AppResult<Vec<Notification>> {
        let mut listed: Vec<Notification> = self
            .state
            .lock()
            .await
            .notifications
            .iter()
            .filter(|notification| {
                notification.recipient_id() == query.recipient_id
                    && (!query.unread_only || !notification.is_read())
            })
            .cloned()
            .collect();
        listed.sort_by_key(|notification| std::cmp::Reverse(notification.created_at()));
        Ok(listed)
    }

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        let mut state = self.state.lock().await;
        let Some(stored) = state
            .notifications
            .iter_mut()
            .find(|notification| notification.id() == notification_id)
        else {
            return Ok(None);
        };

        stored.mark_read();
        Ok(Some(stored.clone()))
    }
}

/// Services wired to fakes with one member, one librarian and one book.
pub(crate) struct Fixture {
    pub(crate) workflow: AccessWorkflowService,
    pub(crate) notifications: NotificationService,
    pub(crate) ledger: Arc<FakeAccessLedger>,
    pub(crate) member: UserId,
    pub(crate) other_member: UserId,
    pub(crate) librarian: UserId,
    pub(crate) book: BookId,
}

pub(crate) fn fixture() -> Fixture {
    fixture_with_ledger(FakeAccessLedger::default())
}

pub(crate) fn fixture_with_ledger(ledger: FakeAccessLedger) -> Fixture {
    let mut identity_store = FakeIdentityStore::default();
    let member = identity_store.add_user("reader", UserRole::Member);
    let other_member = identity_store.add_user("second-reader", UserRole::Member);
    let librarian = identity_store.add_user("librarian", UserRole::Librarian);
    let book = identity_store.add_book(BOOK_TITLE);
    identity_store.shared_handle = Some(Arc::clone(&ledger.state));

    let identity_store = Arc::new(identity_store);
    let ledger = Arc::new(ledger);

    Fixture {
        workflow: AccessWorkflowService::new(identity_store.clone(), ledger.clone()),
        notifications: NotificationService::new(identity_store, ledger.clone()),
        ledger,
        member,
        other_member,
        librarian,
        book,
    }
}
