use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use librarium_application::{ProcessAccessRequestInput, SubmitAccessRequestInput};
use librarium_domain::{AccessDecision, AccessRequestId, AccessRequestStatus, BookId, UserId};
use tracing::info;
use uuid::Uuid;

use crate::dto::{
    AccessCheckResponse, AccessRequestListQuery, AccessRequestResponse,
    ProcessAccessRequestRequest, SubmitAccessRequestRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn submit_access_request_handler(
    State(state): State<AppState>,
    Json(payload): Json<SubmitAccessRequestRequest>,
) -> ApiResult<(StatusCode, Json<AccessRequestResponse>)> {
    let request = state
        .access_workflow_service
        .submit(SubmitAccessRequestInput {
            requester_id: UserId::from_uuid(payload.user_id),
            book_id: BookId::from_uuid(payload.book_id),
            reason: payload.reason,
        })
        .await?;

    info!(
        request_id = %request.id(),
        user_id = %request.requester_id(),
        book_id = %request.book_id(),
        "access request submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(AccessRequestResponse::from(request)),
    ))
}

pub async fn list_access_requests_handler(
    State(state): State<AppState>,
    Query(query): Query<AccessRequestListQuery>,
) -> ApiResult<Json<Vec<AccessRequestResponse>>> {
    let status = query
        .status
        .as_deref()
        .map(AccessRequestStatus::from_str)
        .transpose()?
        // Librarian queue.
        .unwrap_or(AccessRequestStatus::Pending);

    let requests = state
        .access_workflow_service
        .list_requests_by_status(status)
        .await?
        .into_iter()
        .map(AccessRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

pub async fn get_access_request_handler(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<Json<AccessRequestResponse>> {
    let request = state
        .access_workflow_service
        .get_request(AccessRequestId::from_uuid(request_id))
        .await?;

    Ok(Json(AccessRequestResponse::from(request)))
}

pub async fn process_access_request_handler(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ProcessAccessRequestRequest>,
) -> ApiResult<Json<AccessRequestResponse>> {
    let request = state
        .access_workflow_service
        .process(ProcessAccessRequestInput {
            request_id: AccessRequestId::from_uuid(request_id),
            processor_id: UserId::from_uuid(payload.librarian_id),
            decision: AccessDecision::from_flag(payload.approved, payload.rejection_reason),
        })
        .await?;

    info!(
        request_id = %request.id(),
        status = request.status().as_str(),
        librarian_id = %payload.librarian_id,
        "access request processed"
    );

    Ok(Json(AccessRequestResponse::from(request)))
}

pub async fn list_user_access_requests_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<AccessRequestResponse>>> {
    let requests = state
        .access_workflow_service
        .list_requests_for_user(UserId::from_uuid(user_id))
        .await?
        .into_iter()
        .map(AccessRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

pub async fn check_access_handler(
    State(state): State<AppState>,
    Path((user_id, book_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let has_access = state
        .access_workflow_service
        .has_access(UserId::from_uuid(user_id), BookId::from_uuid(book_id))
        .await?;

    Ok(Json(AccessCheckResponse {
        user_id,
        book_id,
        has_access,
    }))
}
