//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod access_workflow_service;
mod notification_service;

#[cfg(test)]
mod test_support;

pub use access_ports::{
    AccessLedger, AccessRequestQuery, AccessUnitOfWork, IdentityStore, NotificationQuery,
    NotificationRepository, NotificationSink, PermissionLedger, RequestLedger,
};
pub use access_workflow_service::{
    AccessWorkflowService, ProcessAccessRequestInput, SubmitAccessRequestInput,
};
pub use notification_service::NotificationService;
