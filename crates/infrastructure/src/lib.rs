//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_ledger;
mod in_memory_identity_store;
mod postgres_access_ledger;
mod postgres_identity_store;

pub use in_memory_access_ledger::InMemoryAccessLedger;
pub use in_memory_identity_store::InMemoryIdentityStore;
pub use postgres_access_ledger::PostgresAccessLedger;
pub use postgres_identity_store::PostgresIdentityStore;
