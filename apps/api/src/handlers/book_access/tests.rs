use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::dto::{
    AccessRequestListQuery, AccessRequestResponse, ProcessAccessRequestRequest,
    SubmitAccessRequestRequest,
};
use crate::handlers::books::get_book_handler;
use crate::handlers::test_support::{SeededState, seeded_state};

use super::{
    check_access_handler, get_access_request_handler, list_access_requests_handler,
    list_user_access_requests_handler, process_access_request_handler,
    submit_access_request_handler,
};

async fn submit(seeded: &SeededState) -> AccessRequestResponse {
    let (status, Json(response)) = submit_access_request_handler(
        State(seeded.state.clone()),
        Json(SubmitAccessRequestRequest {
            user_id: seeded.member.as_uuid(),
            book_id: seeded.book.as_uuid(),
            reason: "reading group".to_owned(),
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(status, StatusCode::CREATED);
    response
}

fn decision(seeded: &SeededState, approved: bool) -> Json<ProcessAccessRequestRequest> {
    Json(ProcessAccessRequestRequest {
        librarian_id: seeded.librarian.as_uuid(),
        approved,
        rejection_reason: (!approved).then(|| "not available".to_owned()),
    })
}

#[tokio::test]
async fn submit_then_approve_grants_access() {
    let seeded = seeded_state().await;
    let submitted = submit(&seeded).await;
    assert_eq!(submitted.status, "pending");

    let processed = process_access_request_handler(
        State(seeded.state.clone()),
        Path(submitted.request_id),
        decision(&seeded, true),
    )
    .await;
    assert!(matches!(processed, Ok(Json(ref response)) if response.status == "approved"));

    let checked = check_access_handler(
        State(seeded.state.clone()),
        Path((seeded.member.as_uuid(), seeded.book.as_uuid())),
    )
    .await;
    assert!(matches!(checked, Ok(Json(ref response)) if response.has_access));
}

#[tokio::test]
async fn duplicate_submission_is_conflict() {
    let seeded = seeded_state().await;
    submit(&seeded).await;

    let response = submit_access_request_handler(
        State(seeded.state.clone()),
        Json(SubmitAccessRequestRequest {
            user_id: seeded.member.as_uuid(),
            book_id: seeded.book.as_uuid(),
            reason: String::new(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn processing_twice_is_conflict() {
    let seeded = seeded_state().await;
    let submitted = submit(&seeded).await;
    let first = process_access_request_handler(
        State(seeded.state.clone()),
        Path(submitted.request_id),
        decision(&seeded, false),
    )
    .await;
    assert!(
        matches!(first, Ok(Json(ref response)) if response.rejection_reason.as_deref() == Some("not available"))
    );

    let second = process_access_request_handler(
        State(seeded.state.clone()),
        Path(submitted.request_id),
        decision(&seeded, true),
    )
    .await
    .into_response();

    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn member_cannot_process_requests() {
    let seeded = seeded_state().await;
    let submitted = submit(&seeded).await;

    let response = process_access_request_handler(
        State(seeded.state.clone()),
        Path(submitted.request_id),
        Json(ProcessAccessRequestRequest {
            librarian_id: seeded.member.as_uuid(),
            approved: true,
            rejection_reason: None,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let seeded = seeded_state().await;

    let request = get_access_request_handler(State(seeded.state.clone()), Path(Uuid::new_v4()))
        .await
        .into_response();
    let check = check_access_handler(
        State(seeded.state.clone()),
        Path((Uuid::new_v4(), seeded.book.as_uuid())),
    )
    .await
    .into_response();
    let book = get_book_handler(State(seeded.state.clone()), Path(Uuid::new_v4()))
        .await
        .into_response();

    assert_eq!(request.status(), StatusCode::NOT_FOUND);
    assert_eq!(check.status(), StatusCode::NOT_FOUND);
    assert_eq!(book.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listings_default_to_pending_and_reject_unknown_status() {
    let seeded = seeded_state().await;
    let submitted = submit(&seeded).await;

    let pending = list_access_requests_handler(
        State(seeded.state.clone()),
        Query(AccessRequestListQuery::default()),
    )
    .await;
    let mine =
        list_user_access_requests_handler(State(seeded.state.clone()), Path(seeded.member.as_uuid()))
            .await;
    let invalid = list_access_requests_handler(
        State(seeded.state.clone()),
        Query(AccessRequestListQuery {
            status: Some("archived".to_owned()),
        }),
    )
    .await
    .into_response();

    assert!(
        matches!(pending, Ok(Json(ref listed)) if listed.len() == 1 && listed[0].request_id == submitted.request_id)
    );
    assert!(matches!(mine, Ok(Json(ref listed)) if listed.len() == 1));
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn request_payload_defaults_missing_reason() {
    let payload: Result<SubmitAccessRequestRequest, _> = serde_json::from_value(
        serde_json::json!({
            "user_id": Uuid::nil(),
            "book_id": Uuid::nil(),
        }),
    );

    assert!(matches!(payload, Ok(ref payload) if payload.reason.is_empty()));
}
