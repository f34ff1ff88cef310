mod book_access;
mod common;
mod notifications;

pub use book_access::{
    AccessCheckResponse, AccessRequestListQuery, AccessRequestResponse, BookResponse,
    ProcessAccessRequestRequest, SubmitAccessRequestRequest,
};
pub use common::HealthResponse;
pub use notifications::{NotificationListQuery, NotificationResponse};
