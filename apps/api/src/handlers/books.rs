use axum::Json;
use axum::extract::{Path, State};
use librarium_domain::BookId;
use uuid::Uuid;

use crate::dto::BookResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_book_handler(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> ApiResult<Json<BookResponse>> {
    let book = state
        .access_workflow_service
        .get_book(BookId::from_uuid(book_id))
        .await?;

    Ok(Json(BookResponse::from(book)))
}
