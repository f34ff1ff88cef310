mod identity;
mod ledger;
mod notifications;

pub use identity::IdentityStore;
pub use ledger::{
    AccessLedger, AccessRequestQuery, AccessUnitOfWork, NotificationSink, PermissionLedger,
    RequestLedger,
};
pub use notifications::{NotificationQuery, NotificationRepository};
