use std::collections::HashMap;

use async_trait::async_trait;
use librarium_application::IdentityStore;
use librarium_core::AppResult;
use librarium_domain::{Book, BookId, UserAccount, UserId};
use tokio::sync::RwLock;

/// In-memory identity store for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    users: RwLock<HashMap<UserId, UserAccount>>,
    books: RwLock<HashMap<BookId, Book>>,
}

impl InMemoryIdentityStore {
    /// Creates an empty identity store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record.
    pub async fn insert_user(&self, user: UserAccount) {
        self.users.write().await.insert(user.id(), user);
    }

    /// Inserts or replaces a book record.
    pub async fn insert_book(&self, book: Book) {
        self.books.write().await.insert(book.id(), book);
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_book(&self, book_id: BookId) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&book_id).cloned())
    }
}
