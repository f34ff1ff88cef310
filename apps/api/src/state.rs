use librarium_application::{AccessWorkflowService, NotificationService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_workflow_service: AccessWorkflowService,
    pub notification_service: NotificationService,
}
