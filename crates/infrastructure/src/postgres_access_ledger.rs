use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;

use librarium_application::{
    AccessLedger, AccessRequestQuery, AccessUnitOfWork, NotificationQuery, NotificationRepository,
};
use librarium_core::{AppError, AppResult};
use librarium_domain::{
    AccessPermission, AccessPermissionId, AccessRequest, AccessRequestId, AccessRequestParts,
    AccessRequestStatus, BookId, Notification, NotificationId, NotificationType, UserId,
};

mod unit_of_work;


use unit_of_work::PostgresAccessUnitOfWork;

/// PostgreSQL-backed access ledger.
///
/// Each unit of work is one READ COMMITTED transaction. Writers on the same
/// (user, book) pair are serialized with a transaction-scoped advisory lock and
/// the partial unique indexes in the schema back up both ledger invariants.
#[derive(Clone)]
pub struct PostgresAccessLedger {
    pool: PgPool,
}

impl PostgresAccessLedger {
    /// Creates a ledger with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccessRequestRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    book_id: uuid::Uuid,
    status: String,
    requested_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    processed_by: Option<uuid::Uuid>,
    reason: String,
    rejection_reason: Option<String>,
}

impl TryFrom<AccessRequestRow> for AccessRequest {
    type Error = AppError;

    fn try_from(row: AccessRequestRow) -> Result<Self, Self::Error> {
        let status = AccessRequestStatus::from_str(row.status.as_str()).map_err(|error| {
            AppError::Internal(format!("invalid stored access request status: {error}"))
        })?;

        AccessRequest::restore(AccessRequestParts {
            id: AccessRequestId::from_uuid(row.id),
            requester_id: UserId::from_uuid(row.user_id),
            book_id: BookId::from_uuid(row.book_id),
            status,
            requested_at: row.requested_at,
            processed_at: row.processed_at,
            processed_by: row.processed_by.map(UserId::from_uuid),
            reason: row.reason,
            rejection_reason: row.rejection_reason,
        })
    }
}

#[derive(Debug, FromRow)]
struct AccessPermissionRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    book_id: uuid::Uuid,
    granted_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl From<AccessPermissionRow> for AccessPermission {
    fn from(row: AccessPermissionRow) -> Self {
        AccessPermission::restore(
            AccessPermissionId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            BookId::from_uuid(row.book_id),
            row.granted_at,
            row.expires_at,
            row.is_active,
        )
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    request_id: uuid::Uuid,
    message: String,
    notification_type: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let notification_type = NotificationType::from_str(row.notification_type.as_str())
            .map_err(|error| {
                AppError::Internal(format!("invalid stored notification type: {error}"))
            })?;

        Ok(Notification::restore(
            NotificationId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            AccessRequestId::from_uuid(row.request_id),
            row.message,
            notification_type,
            row.is_read,
            row.created_at,
        ))
    }
}

/// Maps storage failures that the caller may retry to `TransactionAborted`.
pub(crate) fn map_storage_error(error: sqlx::Error, operation: &str) -> AppError {
    let retryable = match &error {
        sqlx::Error::Database(database_error) => matches!(
            database_error.code().as_deref(),
            Some("40001" | "40P01" | "55P03")
        ),
        sqlx::Error::PoolTimedOut => true,
        _ => false,
    };

    if retryable {
        warn!(operation, error = %error, "postgres operation aborted");
        return AppError::TransactionAborted(format!("failed to {operation}: {error}"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some("23505")
    )
}

#[async_trait]
impl AccessLedger for PostgresAccessLedger {
    async fn begin(&self) -> AppResult<Box<dyn AccessUnitOfWork>> {
        let transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| map_storage_error(error, "begin access transaction"))?;

        Ok(Box::new(PostgresAccessUnitOfWork::new(transaction)))
    }

    async fn find_request(&self, request_id: AccessRequestId) -> AppResult<Option<AccessRequest>> {
        let row = sqlx::query_as::<_, AccessRequestRow>(
            r#"
            SELECT id, user_id, book_id, status, requested_at, processed_at,
                   processed_by, reason, rejection_reason
            FROM book_access_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_storage_error(error, "find access request"))?;

        row.map(AccessRequest::try_from).transpose()
    }

    async fn find_active_permission(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessPermission>> {
        let row = sqlx::query_as::<_, AccessPermissionRow>(
            r#"
            SELECT id, user_id, book_id, granted_at, expires_at, is_active
            FROM book_access_permissions
            WHERE user_id = $1
              AND book_id = $2
              AND is_active
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(book_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_storage_error(error, "find active permission"))?;

        Ok(row.map(AccessPermission::from))
    }

    async fn list_requests(&self, query: AccessRequestQuery) -> AppResult<Vec<AccessRequest>> {
        let rows = sqlx::query_as::<_, AccessRequestRow>(
            r#"
            SELECT id, user_id, book_id, status, requested_at, processed_at,
                   processed_by, reason, rejection_reason
            FROM book_access_requests
            WHERE ($1::UUID IS NULL OR user_id = $1)
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY requested_at DESC, id
            "#,
        )
        .bind(query.requester_id.map(|requester_id| requester_id.as_uuid()))
        .bind(query.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_storage_error(error, "list access requests"))?;

        rows.into_iter().map(AccessRequest::try_from).collect()
    }
}

#[async_trait]
impl NotificationRepository for PostgresAccessLedger {
    async fn list_notifications(&self, query: NotificationQuery) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, request_id, message, notification_type, is_read, created_at
            FROM notifications
            WHERE user_id = $1
              AND (NOT $2 OR NOT is_read)
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(query.recipient_id.as_uuid())
        .bind(query.unread_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_storage_error(error, "list notifications"))?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1
            RETURNING id, user_id, request_id, message, notification_type, is_read, created_at
            "#,
        )
        .bind(notification_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_storage_error(error, "mark notification read"))?;

        row.map(Notification::try_from).transpose()
    }
}
