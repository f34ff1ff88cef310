use async_trait::async_trait;

use librarium_core::AppResult;
use librarium_domain::{
    AccessPermission, AccessRequest, AccessRequestId, AccessRequestStatus, BookId, Notification,
    UserId,
};

/// Query parameters for access request listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessRequestQuery {
    /// Optional requester filter.
    pub requester_id: Option<UserId>,
    /// Optional status filter.
    pub status: Option<AccessRequestStatus>,
}

/// Request lifecycle reads and writes inside one unit of work.
#[async_trait]
pub trait RequestLedger: Send {
    /// Serializes this unit of work against every other unit touching the same pair.
    ///
    /// Held until the unit commits or is dropped.
    async fn lock_pair(&mut self, user_id: UserId, book_id: BookId) -> AppResult<()>;

    /// Loads a request and holds it for update until the unit ends.
    async fn find_request_for_update(
        &mut self,
        request_id: AccessRequestId,
    ) -> AppResult<Option<AccessRequest>>;

    /// Finds the pending request for a pair.
    async fn find_pending_request(
        &mut self,
        requester_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessRequest>>;

    /// Finds the active permission for a pair.
    async fn find_active_permission(
        &mut self,
        user_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessPermission>>;

    /// Inserts or updates a request.
    async fn save_request(&mut self, request: &AccessRequest) -> AppResult<()>;
}

/// Permission writes inside one unit of work.
#[async_trait]
pub trait PermissionLedger: Send {
    /// Inserts a new permission.
    async fn save_permission(&mut self, permission: &AccessPermission) -> AppResult<()>;
}

/// Notification writes inside one unit of work.
#[async_trait]
pub trait NotificationSink: Send {
    /// Inserts a new notification.
    async fn save_notification(&mut self, notification: &Notification) -> AppResult<()>;
}

/// Atomic unit spanning the request ledger, the permission ledger and the notification sink.
///
/// Writes become visible only through [`AccessUnitOfWork::commit`]. Dropping the
/// unit without committing discards every write made through it.
#[async_trait]
pub trait AccessUnitOfWork: RequestLedger + PermissionLedger + NotificationSink {
    /// Commits every staged write at once.
    ///
    /// Fails with `TransactionAborted` when the storage could not commit.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Port owning the access ledgers.
#[async_trait]
pub trait AccessLedger: Send + Sync {
    /// Opens a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn AccessUnitOfWork>>;

    /// Finds a request by identifier outside any unit of work.
    async fn find_request(&self, request_id: AccessRequestId) -> AppResult<Option<AccessRequest>>;

    /// Finds the active permission for a pair outside any unit of work.
    async fn find_active_permission(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessPermission>>;

    /// Lists requests matching the query, newest first.
    async fn list_requests(&self, query: AccessRequestQuery) -> AppResult<Vec<AccessRequest>>;
}
