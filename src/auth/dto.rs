use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after login or registration: the public user fields plus
/// the bearer token the client persists.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Full profile as returned by GET /auth/profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub goals: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            age: u.age,
            goals: u.goals,
            height: u.height,
            weight: u.weight,
        }
    }
}

/// Partial profile update. Absent fields are unchanged; a present `password`
/// triggers re-hashing and must meet the minimum length (an empty string is
/// rejected, never treated as "no change").
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
    pub goals: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn user_serialization_skips_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            age: None,
            goals: None,
            height: None,
            weight: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("ann@example.com"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn update_request_distinguishes_absent_from_empty() {
        let absent: UpdateProfileRequest = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert!(absent.password.is_none());

        let empty: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"Bob","password":""}"#).unwrap();
        assert_eq!(empty.password.as_deref(), Some(""));
    }
}
