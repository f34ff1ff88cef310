use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use librarium_domain::{NotificationId, UserId};
use uuid::Uuid;

use crate::dto::{NotificationListQuery, NotificationResponse};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let notifications = state
        .notification_service
        .list_for_user(UserId::from_uuid(user_id), query.unread_only.unwrap_or(false))
        .await?
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    Ok(Json(notifications))
}

pub async fn mark_notification_read_handler(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .notification_service
        .mark_read(NotificationId::from_uuid(notification_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
