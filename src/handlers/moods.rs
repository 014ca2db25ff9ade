// Mood log handlers
// One storage call per request; errors flow out as ApiError

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use super::JsonBody;
use crate::{
    error::ApiError,
    models::{CreateMoodLogRequest, UpdateMoodLogRequest},
    store::SharedStore,
};

/// Create a new mood log
/// POST /add-mood
pub async fn create_mood(
    State(store): State<SharedStore>,
    JsonBody(request): JsonBody<CreateMoodLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Creating mood log with mood: {:?}", request.mood);

    let mood_log = store.create_mood_log(request).await?;

    info!("Successfully created mood log with id: {}", mood_log.id);
    Ok((StatusCode::CREATED, Json(mood_log)))
}

/// List every mood log, newest date first
/// GET /moods
pub async fn list_moods(State(store): State<SharedStore>) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all mood logs");

    let mood_logs = store.list_mood_logs().await?;

    info!("Retrieved {} mood logs", mood_logs.len());
    Ok((StatusCode::OK, Json(mood_logs)))
}

/// Overwrite mood, notes and date of a mood log.
/// PUT /moods/:id
///
/// An unknown id is still a 200; the body is `null`.
pub async fn update_mood(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateMoodLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Updating mood log with id: {}", id);

    let mood_log = store.update_mood_log(&id, request).await?;

    Ok((StatusCode::OK, Json(mood_log)))
}

/// Delete a mood log
/// DELETE /moods/:id
pub async fn delete_mood(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting mood log with id: {}", id);

    store.delete_mood_log(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
