use axum::Router;
use axum::routing::{get, post};
use librarium_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let book_access_routes = Router::new()
        .route(
            "/api/book-access/requests",
            get(handlers::book_access::list_access_requests_handler)
                .post(handlers::book_access::submit_access_request_handler),
        )
        .route(
            "/api/book-access/requests/{request_id}",
            get(handlers::book_access::get_access_request_handler),
        )
        .route(
            "/api/book-access/requests/{request_id}/process",
            post(handlers::book_access::process_access_request_handler),
        )
        .route(
            "/api/book-access/users/{user_id}/requests",
            get(handlers::book_access::list_user_access_requests_handler),
        )
        .route(
            "/api/book-access/check/{user_id}/{book_id}",
            get(handlers::book_access::check_access_handler),
        )
        .route("/api/books/{book_id}", get(handlers::books::get_book_handler));

    let notification_routes = Router::new()
        .route(
            "/api/notifications/users/{user_id}",
            get(handlers::notifications::list_notifications_handler),
        )
        .route(
            "/api/notifications/{notification_id}/read",
            post(handlers::notifications::mark_notification_read_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(book_access_routes)
        .merge(notification_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
