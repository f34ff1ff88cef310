use librarium_domain::{Book, BookId, UserAccount, UserId, UserRole};

use crate::api_services::memory_backend;
use crate::state::AppState;

pub(crate) struct SeededState {
    pub(crate) state: AppState,
    pub(crate) member: UserId,
    pub(crate) librarian: UserId,
    pub(crate) book: BookId,
}

pub(crate) async fn seeded_state() -> SeededState {
    let backend = memory_backend();
    let member = UserId::new();
    let librarian = UserId::new();
    let book = BookId::new();

    let seeded = [
        backend
            .identity_writer
            .insert_user(
                UserAccount::new(member, "reader", "Reader", None, UserRole::Member)
                    .unwrap_or_else(|_| unreachable!()),
            )
            .await,
        backend
            .identity_writer
            .insert_user(
                UserAccount::new(librarian, "librarian", "Librarian", None, UserRole::Librarian)
                    .unwrap_or_else(|_| unreachable!()),
            )
            .await,
        backend
            .identity_writer
            .insert_book(
                Book::new(book, "Neuromancer", "William Gibson", "", None)
                    .unwrap_or_else(|_| unreachable!()),
            )
            .await,
    ];
    assert!(seeded.iter().all(Result::is_ok));

    SeededState {
        state: backend.app_state,
        member,
        librarian,
        book,
    }
}
