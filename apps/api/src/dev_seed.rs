use librarium_core::AppResult;
use librarium_domain::{Book, BookId, UserAccount, UserId, UserRole};
use tracing::info;
use uuid::Uuid;

use crate::api_services::IdentityWriter;

const DEV_SEED_LIBRARIAN_ID: Uuid = Uuid::from_u128(0x5d1c_7e2a_0b44_4c1f_9a3e_1f2b_3c4d_5e01);
const DEV_SEED_MEMBER_ID: Uuid = Uuid::from_u128(0x5d1c_7e2a_0b44_4c1f_9a3e_1f2b_3c4d_5e02);
const DEV_SEED_SECOND_MEMBER_ID: Uuid = Uuid::from_u128(0x5d1c_7e2a_0b44_4c1f_9a3e_1f2b_3c4d_5e03);

const DEV_SEED_BOOKS: [(u128, &str, &str); 3] = [
    (
        0x7a90_2c61_d3e8_4f0b_8c15_6e7f_8091_a201,
        "The Dispossessed",
        "Ursula K. Le Guin",
    ),
    (
        0x7a90_2c61_d3e8_4f0b_8c15_6e7f_8091_a202,
        "A Canticle for Leibowitz",
        "Walter M. Miller Jr.",
    ),
    (
        0x7a90_2c61_d3e8_4f0b_8c15_6e7f_8091_a203,
        "Roadside Picnic",
        "Arkady and Boris Strugatsky",
    ),
];

/// Inserts a fixed set of users and books. Safe to run repeatedly.
pub async fn run(identity_writer: &IdentityWriter) -> AppResult<()> {
    let users = [
        (
            DEV_SEED_LIBRARIAN_ID,
            "librarian",
            "Head Librarian",
            Some("librarian@librarium.local"),
            UserRole::Librarian,
        ),
        (
            DEV_SEED_MEMBER_ID,
            "reader",
            "Avid Reader",
            Some("reader@librarium.local"),
            UserRole::Member,
        ),
        (
            DEV_SEED_SECOND_MEMBER_ID,
            "student",
            "Graduate Student",
            None,
            UserRole::Member,
        ),
    ];

    for (id, username, full_name, email, role) in users {
        identity_writer
            .insert_user(UserAccount::new(
                UserId::from_uuid(id),
                username,
                full_name,
                email.map(str::to_owned),
                role,
            )?)
            .await?;
    }

    for (id, title, author) in DEV_SEED_BOOKS {
        identity_writer
            .insert_book(Book::new(
                BookId::from_uuid(Uuid::from_u128(id)),
                title,
                author,
                "",
                None,
            )?)
            .await?;
    }

    info!(
        librarian_id = %DEV_SEED_LIBRARIAN_ID,
        member_id = %DEV_SEED_MEMBER_ID,
        books = DEV_SEED_BOOKS.len(),
        "development seed data applied"
    );

    Ok(())
}
