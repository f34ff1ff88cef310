use std::sync::Arc;

use librarium_application::{
    AccessLedger, AccessWorkflowService, IdentityStore, NotificationRepository,
    NotificationService,
};
use librarium_core::AppResult;
use librarium_domain::{Book, UserAccount};
use librarium_infrastructure::{
    InMemoryAccessLedger, InMemoryIdentityStore, PostgresAccessLedger, PostgresIdentityStore,
};
use sqlx::PgPool;

use crate::state::AppState;

/// Write access to whichever identity store backs the running services.
#[derive(Clone)]
pub enum IdentityWriter {
    Postgres(PostgresIdentityStore),
    Memory(Arc<InMemoryIdentityStore>),
}

impl IdentityWriter {
    pub async fn insert_user(&self, user: UserAccount) -> AppResult<()> {
        match self {
            Self::Postgres(store) => store.insert_user(&user).await,
            Self::Memory(store) => {
                store.insert_user(user).await;
                Ok(())
            }
        }
    }

    pub async fn insert_book(&self, book: Book) -> AppResult<()> {
        match self {
            Self::Postgres(store) => store.insert_book(&book).await,
            Self::Memory(store) => {
                store.insert_book(book).await;
                Ok(())
            }
        }
    }
}

/// Application state together with the identity writer used for seeding.
pub struct Backend {
    pub app_state: AppState,
    pub identity_writer: IdentityWriter,
}

pub fn postgres_backend(pool: PgPool) -> Backend {
    let identity_store = PostgresIdentityStore::new(pool.clone());
    let ledger = Arc::new(PostgresAccessLedger::new(pool));

    Backend {
        app_state: build_app_state(Arc::new(identity_store.clone()), ledger),
        identity_writer: IdentityWriter::Postgres(identity_store),
    }
}

pub fn memory_backend() -> Backend {
    let identity_store = Arc::new(InMemoryIdentityStore::new());
    let ledger = Arc::new(InMemoryAccessLedger::new());

    Backend {
        app_state: build_app_state(identity_store.clone(), ledger),
        identity_writer: IdentityWriter::Memory(identity_store),
    }
}

fn build_app_state<L>(identity_store: Arc<dyn IdentityStore>, ledger: Arc<L>) -> AppState
where
    L: AccessLedger + NotificationRepository + 'static,
{
    AppState {
        access_workflow_service: AccessWorkflowService::new(
            identity_store.clone(),
            ledger.clone(),
        ),
        notification_service: NotificationService::new(identity_store, ledger),
    }
}
