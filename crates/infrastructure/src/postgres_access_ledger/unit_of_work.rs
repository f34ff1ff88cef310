use sqlx::{Postgres, Transaction};
use tracing::debug;

use librarium_application::{NotificationSink, PermissionLedger, RequestLedger};

use super::*;

/// One access ledger transaction. Dropping it rolls the transaction back.
pub(super) struct PostgresAccessUnitOfWork {
    transaction: Transaction<'static, Postgres>,
}

impl PostgresAccessUnitOfWork {
    pub(super) fn new(transaction: Transaction<'static, Postgres>) -> Self {
        Self { transaction }
    }
}

#[async_trait]
impl RequestLedger for PostgresAccessUnitOfWork {
    async fn lock_pair(&mut self, user_id: UserId, book_id: BookId) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("book-access:{user_id}:{book_id}"))
            .execute(&mut *self.transaction)
            .await
            .map_err(|error| map_storage_error(error, "lock access pair"))?;

        Ok(())
    }

    async fn find_request_for_update(
        &mut self,
        request_id: AccessRequestId,
    ) -> AppResult<Option<AccessRequest>> {
        let row = sqlx::query_as::<_, AccessRequestRow>(
            r#"
            SELECT id, user_id, book_id, status, requested_at, processed_at,
                   processed_by, reason, rejection_reason
            FROM book_access_requests
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(request_id.as_uuid())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| map_storage_error(error, "lock access request"))?;

        row.map(AccessRequest::try_from).transpose()
    }

    async fn find_pending_request(
        &mut self,
        requester_id: UserId,
        book_id: BookId,
    ) -> AppResult<Option<AccessRequest>> {
        let row = sqlx::query_as::<_, AccessRequestRow>(
            r#"
            SELECT id, user_id, book_id, status, requested_at, processed_at,
                   processed_by, reason, rejection_reason
            FROM book_access_requests
            WHERE user_id = $1
              AND book_id = $2
              AND status = 'pending'
            "#,
        )
        .bind(requester_id.as_uuid())
        .bind(book_id.as_uuid())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| map_storage_error(error, "find pending access request"))?;

        row.map(AccessRequest::try_from).transpose()
    }

    async fn find_active_permission(
        &mut self,
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
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| map_storage_error(error, "find active permission"))?;

        Ok(row.map(AccessPermission::from))
    }

    async fn save_request(&mut self, request: &AccessRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO book_access_requests (
                id,
                user_id,
                book_id,
                status,
                requested_at,
                processed_at,
                processed_by,
                reason,
                rejection_reason
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE
            SET status = EXCLUDED.status,
                processed_at = EXCLUDED.processed_at,
                processed_by = EXCLUDED.processed_by,
                rejection_reason = EXCLUDED.rejection_reason
            "#,
        )
        .bind(request.id().as_uuid())
        .bind(request.requester_id().as_uuid())
        .bind(request.book_id().as_uuid())
        .bind(request.status().as_str())
        .bind(request.requested_at())
        .bind(request.processed_at())
        .bind(request.processed_by().map(|processor_id| processor_id.as_uuid()))
        .bind(request.reason())
        .bind(request.rejection_reason())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "user '{}' already has a pending request for book '{}'",
                    request.requester_id(),
                    request.book_id()
                ));
            }

            map_storage_error(error, "save access request")
        })?;

        Ok(())
    }
}

#[async_trait]
impl PermissionLedger for PostgresAccessUnitOfWork {
    async fn save_permission(&mut self, permission: &AccessPermission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO book_access_permissions (
                id,
                user_id,
                book_id,
                granted_at,
                expires_at,
                is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.grantee_id().as_uuid())
        .bind(permission.book_id().as_uuid())
        .bind(permission.granted_at())
        .bind(permission.expires_at())
        .bind(permission.is_active())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Internal(format!(
                    "active permission already exists for user '{}' and book '{}'",
                    permission.grantee_id(),
                    permission.book_id()
                ));
            }

            map_storage_error(error, "save access permission")
        })?;

        Ok(())
    }
}

#[async_trait]
impl NotificationSink for PostgresAccessUnitOfWork {
    async fn save_notification(&mut self, notification: &Notification) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id,
                user_id,
                request_id,
                message,
                notification_type,
                is_read,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id().as_uuid())
        .bind(notification.recipient_id().as_uuid())
        .bind(notification.request_id().as_uuid())
        .bind(notification.message())
        .bind(notification.notification_type().as_str())
        .bind(notification.is_read())
        .bind(notification.created_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Internal(format!(
                    "access request '{}' already has a notification",
                    notification.request_id()
                ));
            }

            map_storage_error(error, "save notification")
        })?;

        Ok(())
    }
}

#[async_trait]
impl AccessUnitOfWork for PostgresAccessUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let PostgresAccessUnitOfWork { transaction } = *self;
        transaction
            .commit()
            .await
            .map_err(|error| map_storage_error(error, "commit access transaction"))?;

        debug!("committed access ledger transaction");
        Ok(())
    }
}
