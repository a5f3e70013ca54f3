use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, ProfileResponse, ProfileUpdatedResponse, RegisterRequest,
            UpdateProfileRequest,
        },
        extractors::CurrentUser,
        jwt::JwtKeys,
        password,
        repo::{ProfileChanges, User},
    },
    error::{is_unique_violation, ApiError},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(get_profile))
        .route("/auth/profile", put(update_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_string();
    payload.name = payload.name.trim().to_string();

    if payload.name.is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    check_password(&payload.password)?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = password::hash(payload.password).await?;

    // The unique index decides the race between concurrent registrations;
    // the pre-check above only covers the common case.
    let user = User::create(&state.db, &payload.name, &payload.email, &hash)
        .await
        .map_err(ApiError::from)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_string();

    // Unknown email and wrong password take the same exit so the response
    // never confirms that an account exists.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    let ok = password::verify(payload.password, user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

#[instrument(skip_all)]
pub async fn get_profile(
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(user.into()))
}

#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    if let Some(email) = &payload.email {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }

    // Absent password means "no change"; a present one (including empty) is
    // validated and re-hashed with a fresh salt.
    let password_hash = match payload.password {
        Some(plain) => {
            check_password(&plain)?;
            Some(password::hash(plain).await?)
        }
        None => None,
    };

    let changes = ProfileChanges {
        name: payload.name,
        email: payload.email,
        age: payload.age,
        goals: payload.goals,
        height: payload.height,
        weight: payload.weight,
        password_hash,
    };

    let updated = User::update_profile(&state.db, user.id, &changes)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::EmailTaken
            } else {
                ApiError::Internal(e.into())
            }
        })?
        .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(ProfileUpdatedResponse {
        id: updated.id,
        name: updated.name,
        email: updated.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com "));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_policy_rejects_short_and_empty() {
        assert!(check_password("short").is_err());
        assert!(check_password("").is_err());
        assert!(check_password("long-enough").is_ok());
    }

    #[test]
    fn auth_response_serialization() {
        let response = AuthResponse {
            id: uuid::Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@example.com".into(),
            token: "header.payload.sig".into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ann@example.com"));
        assert!(json.contains("token"));
    }
}
