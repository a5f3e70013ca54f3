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
    diet::dto::{CreateDietEntryRequest, UpdateDietEntryRequest},
    diet::repo::DietEntry,
    error::ApiError,
    ownership::ensure_owner,
    state::AppState,
};

pub fn diet_routes() -> Router<AppState> {
    Router::new()
        .route("/diet", get(list_entries))
        .route("/diet", post(create_entry))
        .route("/diet/:id", get(get_entry))
        .route("/diet/:id", put(update_entry))
        .route("/diet/:id", delete(delete_entry))
}

#[instrument(skip_all)]
pub async fn list_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<DietEntry>>, ApiError> {
    let entries = DietEntry::list_by_user(&state.db, user.id).await?;
    Ok(Json(entries))
}

#[instrument(skip_all, fields(entry_id = %id))]
pub async fn get_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DietEntry>, ApiError> {
    let entry = DietEntry::find_scoped(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Diet entry"))?;
    Ok(Json(entry))
}

#[instrument(skip_all)]
pub async fn create_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateDietEntryRequest>,
) -> Result<(StatusCode, Json<DietEntry>), ApiError> {
    if payload.meal.trim().is_empty() {
        return Err(ApiError::Validation("Meal is required".into()));
    }

    let entry = DietEntry::create(
        &state.db,
        user.id,
        payload.meal.trim(),
        payload.calories,
        payload.proteins,
        payload.fats,
        payload.carbs,
        payload.date,
    )
    .await?;

    info!(entry_id = %entry.id, user_id = %user.id, "diet entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip_all, fields(entry_id = %id))]
pub async fn update_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDietEntryRequest>,
) -> Result<Json<DietEntry>, ApiError> {
    let existing = DietEntry::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Diet entry"))?;
    ensure_owner("Diet entry", existing.user_id, user.id)?;

    let updated = DietEntry::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Diet entry"))?;
    Ok(Json(updated))
}

#[instrument(skip_all, fields(entry_id = %id))]
pub async fn delete_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let existing = DietEntry::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Diet entry"))?;
    ensure_owner("Diet entry", existing.user_id, user.id)?;

    DietEntry::delete(&state.db, id).await?;
    info!(entry_id = %id, user_id = %user.id, "diet entry deleted");
    Ok(Json(json!({ "message": "Diet entry deleted" })))
}
