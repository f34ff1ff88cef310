use async_trait::async_trait;

use librarium_core::AppResult;
use librarium_domain::{Book, BookId, UserAccount, UserId};

/// Read-only port resolving user and book identifiers.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Finds a user record by identifier.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Finds a book record by identifier.
    async fn find_book(&self, book_id: BookId) -> AppResult<Option<Book>>;
}
