use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use librarium_application::IdentityStore;
use librarium_core::{AppError, AppResult};
use librarium_domain::{Book, BookId, UserAccount, UserId, UserRole};

use crate::postgres_access_ledger::{is_unique_violation, map_storage_error};

/// PostgreSQL-backed lookup for users and books.
#[derive(Clone)]
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a user, leaving an existing row with the same id untouched.
    pub async fn insert_user(&self, user: &UserAccount) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, full_name, email, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.full_name())
        .bind(user.email())
        .bind(user.role().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "username '{}' is already taken",
                    user.username()
                ));
            }

            map_storage_error(error, "insert user")
        })?;

        Ok(())
    }

    /// Inserts a book, leaving an existing row with the same id untouched.
    pub async fn insert_book(&self, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, description, resource_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(book.id().as_uuid())
        .bind(book.title())
        .bind(book.author())
        .bind(book.description())
        .bind(book.resource_url())
        .execute(&self.pool)
        .await
        .map_err(|error| map_storage_error(error, "insert book"))?;

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: uuid::Uuid,
    username: String,
    full_name: String,
    email: Option<String>,
    role: String,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::from_str(row.role.as_str())
            .map_err(|error| AppError::Internal(format!("invalid stored user role: {error}")))?;

        UserAccount::new(
            UserId::from_uuid(row.id),
            row.username,
            row.full_name,
            row.email,
            role,
        )
    }
}

#[derive(Debug, FromRow)]
struct BookRow {
    id: uuid::Uuid,
    title: String,
    author: String,
    description: String,
    resource_url: Option<String>,
}

impl TryFrom<BookRow> for Book {
    type Error = AppError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Book::new(
            BookId::from_uuid(row.id),
            row.title,
            row.author,
            row.description,
            row.resource_url,
        )
    }
}

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, full_name, email, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_storage_error(error, "find user"))?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn find_book(&self, book_id: BookId) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, title, author, description, resource_url
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_storage_error(error, "find book"))?;

        row.map(Book::try_from).transpose()
    }
}
