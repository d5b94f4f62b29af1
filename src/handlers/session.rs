// src/handlers/session.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::session::DismissRequest,
    quiz::{registry::SessionRegistry, runner::SessionHandle},
    state::AppState,
};

/// Starts a quiz session for an item.
///
/// * Fetches the item's content from the learning API.
/// * Logs answer keys that break authoring rules (the session still starts).
/// * Mounts the first question and returns the initial snapshot.
pub async fn start_session(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.api.fetch_item_content(&item_id).await.map_err(|e| {
        tracing::error!("Failed to fetch content for item {}: {}", item_id, e);
        e
    })?;

    for (index, key) in item.exam.quizzes.iter().enumerate() {
        if let Err(errors) = key.validate() {
            tracing::warn!(
                item = %item_id,
                question = index,
                "Answer key breaks authoring rules, it may be unsolvable: {}",
                errors
            );
        }
    }

    let handle = SessionHandle::spawn(item, state.session_deps());
    let snapshot = handle.snapshot().await?;
    state.sessions.insert(handle).await;
    tracing::info!(
        "Started quiz session {} for item {} ({} live)",
        snapshot.id,
        item_id,
        state.sessions.live_count().await
    );

    Ok((StatusCode::CREATED, Json(snapshot)))
}

pub async fn get_session(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = sessions.get(id).await?.snapshot().await?;
    Ok(Json(snapshot))
}

pub async fn click_choice(
    State(sessions): State<SessionRegistry>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = sessions.get(id).await?.click_choice(index).await?;
    Ok(Json(snapshot))
}

pub async fn select_left(
    State(sessions): State<SessionRegistry>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = sessions.get(id).await?.select_left(index).await?;
    Ok(Json(snapshot))
}

pub async fn select_right(
    State(sessions): State<SessionRegistry>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = sessions.get(id).await?.select_right(index).await?;
    Ok(Json(snapshot))
}

/// The explicit "Continue" click. Never waits for the completion write.
pub async fn advance(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = sessions.get(id).await?.advance().await?;
    Ok(Json(snapshot))
}

pub async fn dismiss(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
    Json(req): Json<DismissRequest>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = sessions.get(id).await?.dismiss(req.banner).await?;
    Ok(Json(snapshot))
}

pub async fn retry_completion(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = sessions.get(id).await?.retry_completion().await?;
    Ok(Json(snapshot))
}

/// Closes the session; any pending revert timer is cancelled.
pub async fn close_session(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
