use chrono::{DateTime, Utc};
use librarium_domain::{AccessRequest, Book};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Incoming payload for submitting an access request.
#[derive(Debug, Deserialize)]
pub struct SubmitAccessRequestRequest {
    pub user_id: Uuid,
    pub book_id: Uuid,
    #[serde(default)]
    pub reason: String,
}

/// Incoming payload for a librarian decision.
#[derive(Debug, Deserialize)]
pub struct ProcessAccessRequestRequest {
    pub librarian_id: Uuid,
    pub approved: bool,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Query string for request listings.
#[derive(Debug, Default, Deserialize)]
pub struct AccessRequestListQuery {
    pub status: Option<String>,
}

/// API representation of an access request.
#[derive(Debug, Serialize)]
pub struct AccessRequestResponse {
    pub request_id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub status: &'static str,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub reason: String,
    pub rejection_reason: Option<String>,
}

impl From<AccessRequest> for AccessRequestResponse {
    fn from(value: AccessRequest) -> Self {
        Self {
            request_id: value.id().as_uuid(),
            user_id: value.requester_id().as_uuid(),
            book_id: value.book_id().as_uuid(),
            status: value.status().as_str(),
            requested_at: value.requested_at(),
            processed_at: value.processed_at(),
            processed_by: value.processed_by().map(|processor_id| processor_id.as_uuid()),
            reason: value.reason().to_owned(),
            rejection_reason: value.rejection_reason().map(str::to_owned),
        }
    }
}

/// Answer to an access check.
#[derive(Debug, Serialize)]
pub struct AccessCheckResponse {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub has_access: bool,
}

/// API representation of a book.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub resource_url: Option<String>,
}

impl From<Book> for BookResponse {
    fn from(value: Book) -> Self {
        Self {
            book_id: value.id().as_uuid(),
            title: value.title().to_owned(),
            author: value.author().to_owned(),
            description: value.description().to_owned(),
            resource_url: value.resource_url().map(str::to_owned),
        }
    }
}
