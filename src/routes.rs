// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{progress, session},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Session routes drive a quiz session (clicks, continue, dismiss, close).
/// * View routes read the cached progress views.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let item_routes = Router::new().route("/{item_id}/sessions", post(session::start_session));

    let session_routes = Router::new()
        .route(
            "/{id}",
            get(session::get_session).delete(session::close_session),
        )
        .route("/{id}/choices/{index}", post(session::click_choice))
        .route("/{id}/left/{index}", post(session::select_left))
        .route("/{id}/right/{index}", post(session::select_right))
        .route("/{id}/continue", post(session::advance))
        .route("/{id}/dismiss", post(session::dismiss))
        .route("/{id}/completion/retry", post(session::retry_completion));

    let view_routes = Router::new().route("/{view}/{scope_id}", get(progress::get_view));

    Router::new()
        .nest("/api/items", item_routes)
        .nest("/api/sessions", session_routes)
        .nest("/api/views", view_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
