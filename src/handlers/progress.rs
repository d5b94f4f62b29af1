// src/handlers/progress.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    progress::{ProgressView, ProgressViews},
};

/// Returns the cached progress view for a scope, fetching it on a miss.
pub async fn get_view(
    State(views): State<ProgressViews>,
    Path((view, scope_id)): Path<(ProgressView, String)>,
) -> Result<impl IntoResponse, AppError> {
    let cache = views
        .get(view)
        .ok_or_else(|| AppError::NotFound(format!("View {:?} not registered", view)))?;

    let entry = cache.get(&scope_id).await.map_err(|e| {
        tracing::error!("Failed to load {:?} view for {}: {}", view, scope_id, e);
        e
    })?;

    Ok(Json(entry))
}
