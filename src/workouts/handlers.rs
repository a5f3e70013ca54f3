use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    ownership::ensure_owner,
    state::AppState,
    workouts::dto::{CreateWorkoutRequest, UpdateWorkoutRequest},
    workouts::repo::Workout,
};

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts))
        .route("/workouts", post(create_workout))
        .route("/workouts/:id", get(get_workout))
        .route("/workouts/:id", put(update_workout))
        .route("/workouts/:id", delete(delete_workout))
}

#[instrument(skip_all)]
pub async fn list_workouts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Workout>>, ApiError> {
    let workouts = Workout::list_by_user(&state.db, user.id).await?;
    Ok(Json(workouts))
}

#[instrument(skip_all, fields(workout_id = %id))]
pub async fn get_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Workout>, ApiError> {
    let workout = Workout::find_scoped(&state.db, user.id, id)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;
    Ok(Json(workout))
}

#[instrument(skip_all)]
pub async fn create_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    if payload.exercise.trim().is_empty() {
        return Err(ApiError::Validation("Exercise is required".into()));
    }
    if payload.sets < 1 || payload.reps < 1 {
        return Err(ApiError::Validation("Sets and reps must be positive".into()));
    }

    // Owner comes from the verified caller; the body cannot supply one.
    let workout = Workout::create(
        &state.db,
        user.id,
        payload.exercise.trim(),
        payload.sets,
        payload.reps,
        payload.weight,
        payload.date.unwrap_or_else(OffsetDateTime::now_utc),
    )
    .await?;

    info!(workout_id = %workout.id, user_id = %user.id, "workout created");
    Ok((StatusCode::CREATED, Json(workout)))
}

#[instrument(skip_all, fields(workout_id = %id))]
pub async fn update_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkoutRequest>,
) -> Result<Json<Workout>, ApiError> {
    let existing = Workout::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;
    ensure_owner("Workout", existing.user_id, user.id)?;

    let updated = Workout::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;
    Ok(Json(updated))
}

#[instrument(skip_all, fields(workout_id = %id))]
pub async fn delete_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let existing = Workout::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;
    ensure_owner("Workout", existing.user_id, user.id)?;

    Workout::delete(&state.db, id).await?;
    info!(workout_id = %id, user_id = %user.id, "workout deleted");
    Ok(Json(json!({ "message": "Workout deleted" })))
}
