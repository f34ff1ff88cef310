//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access_permission;
mod access_request;
mod book;
mod notification;
mod user;

pub use access_permission::{AccessPermission, AccessPermissionId};
pub use access_request::{
    AccessDecision, AccessRequest, AccessRequestId, AccessRequestParts, AccessRequestStatus,
};
pub use book::{Book, BookId};
pub use notification::{Notification, NotificationId, NotificationType};
pub use user::{EmailAddress, UserAccount, UserId, UserRole};
