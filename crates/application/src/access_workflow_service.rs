//! Access request lifecycle engine.
//!
//! Every mutating operation runs inside one [`AccessUnitOfWork`] and commits
//! once. An error at any step drops the unit, which discards all of its writes.

use std::sync::Arc;

use chrono::Utc;

use librarium_core::{AppError, AppResult};
use librarium_domain::{
    AccessDecision, AccessPermission, AccessRequest, AccessRequestId, AccessRequestStatus, Book,
    BookId, Notification, UserAccount, UserId,
};

use crate::access_ports::{AccessLedger, AccessRequestQuery, IdentityStore};

mod process;
mod queries;
mod submit;


/// Input payload for a new access request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAccessRequestInput {
    /// Requesting user.
    pub requester_id: UserId,
    /// Requested book.
    pub book_id: BookId,
    /// Free-text justification.
    pub reason: String,
}

/// Input payload for a librarian decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessAccessRequestInput {
    /// Request being decided.
    pub request_id: AccessRequestId,
    /// Librarian making the decision.
    pub processor_id: UserId,
    /// Approval or rejection with its reason.
    pub decision: AccessDecision,
}

/// Application service orchestrating access requests, permissions and notifications.
#[derive(Clone)]
pub struct AccessWorkflowService {
    identity_store: Arc<dyn IdentityStore>,
    ledger: Arc<dyn AccessLedger>,
}

impl AccessWorkflowService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(identity_store: Arc<dyn IdentityStore>, ledger: Arc<dyn AccessLedger>) -> Self {
        Self {
            identity_store,
            ledger,
        }
    }

    /// Returns whether the user currently holds an active permission for the book.
    pub async fn has_access(&self, user_id: UserId, book_id: BookId) -> AppResult<bool> {
        self.resolve_user(user_id, "user").await?;
        self.resolve_book(book_id).await?;

        Ok(self
            .ledger
            .find_active_permission(user_id, book_id)
            .await?
            .is_some())
    }

    async fn resolve_user(&self, user_id: UserId, label: &str) -> AppResult<UserAccount> {
        self.identity_store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{label} '{user_id}' was not found")))
    }

    async fn resolve_book(&self, book_id: BookId) -> AppResult<Book> {
        self.identity_store
            .find_book(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("book '{book_id}' was not found")))
    }
}
