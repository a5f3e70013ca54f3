use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    ownership::ensure_owner,
    state::AppState,
    transformation::dto::{CreateProgressRequest, UpdateProgressRequest},
    transformation::repo::ProgressEntry,
};

pub fn transformation_routes() -> Router<AppState> {
    Router::new()
        .route("/transformation", get(list_progress))
        .route("/transformation", post(create_progress))
        .route("/transformation/:id", get(get_progress))
        .route("/transformation/:id", put(update_progress))
        .route("/transformation/:id", delete(delete_progress))
}

#[instrument(skip_all)]
pub async fn list_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ProgressEntry>>, ApiError> {
    let entries = ProgressEntry::list_by_user(&state.db, user.id).await?;
    Ok(Json(entries))
}

#[instrument(skip_all, fields(entry_id = %id))]
pub async fn get_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProgressEntry>, ApiError> {
    let entry = ProgressEntry::find_scoped(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Progress entry"))?;
    Ok(Json(entry))
}

#[instrument(skip_all)]
pub async fn create_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateProgressRequest>,
) -> Result<(StatusCode, Json<ProgressEntry>), ApiError> {
    if payload.image.is_empty() {
        return Err(ApiError::Validation("Image is required".into()));
    }

    let entry = ProgressEntry::create(&state.db, user.id, &payload).await?;

    info!(entry_id = %entry.id, user_id = %user.id, "progress entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip_all, fields(entry_id = %id))]
pub async fn update_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<Json<ProgressEntry>, ApiError> {
    let existing = ProgressEntry::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Progress entry"))?;
    ensure_owner("Progress entry", existing.user_id, user.id)?;

    let updated = ProgressEntry::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Progress entry"))?;
    Ok(Json(updated))
}

#[instrument(skip_all, fields(entry_id = %id))]
pub async fn delete_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let existing = ProgressEntry::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Progress entry"))?;
    ensure_owner("Progress entry", existing.user_id, user.id)?;

    ProgressEntry::delete(&state.db, id).await?;
    info!(entry_id = %id, user_id = %user.id, "progress entry deleted");
    Ok(Json(json!({ "message": "Progress entry deleted" })))
}
