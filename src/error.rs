use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application-level failure taxonomy. Every handler and guard funnels into
/// one of these variants; the client only ever sees the mapped status and a
/// `{"message": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input fields.
    #[error("{0}")]
    Validation(String),

    /// Login failed. Unknown email and wrong password produce this same
    /// variant so the response never confirms account existence.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, expired, or unverifiable bearer credential, or a
    /// verified subject with no matching user. Uniform on purpose.
    #[error("Not authorized")]
    Unauthenticated,

    /// Valid identity, wrong owner.
    #[error("Not authorized to modify this resource")]
    Forbidden,

    /// Resource genuinely absent. Distinct from `Forbidden`.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Duplicate email at registration or profile update.
    #[error("Email already registered")]
    EmailTaken,

    /// Anything unexpected. Logged server-side, generic body to the client.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation(&e) {
            return Self::EmailTaken;
        }
        Self::Internal(e.into())
    }
}

/// Postgres unique-constraint violation (SQLSTATE 23505). The unique index on
/// `users.email` is the arbiter for concurrent registrations: of two racing
/// inserts exactly one lands here.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Workout").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::EmailTaken.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn forbidden_is_distinct_from_not_found() {
        assert_ne!(
            ApiError::Forbidden.status(),
            ApiError::NotFound("Workout").status()
        );
    }

    #[test]
    fn login_failure_message_does_not_name_the_field() {
        // Same text for unknown email and wrong password.
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[derive(Debug)]
    struct StubDbError(&'static str);

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(self.0.into())
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.0 == "23505" {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_is_detected_by_sqlstate() {
        let dup = sqlx::Error::Database(Box::new(StubDbError("23505")));
        assert!(is_unique_violation(&dup));

        let other = sqlx::Error::Database(Box::new(StubDbError("23503")));
        assert!(!is_unique_violation(&other));
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn duplicate_email_maps_to_conflict() {
        // Of two racing registrations, the loser's insert surfaces as a
        // 23505 database error and must come back as a 409.
        let err = ApiError::from(sqlx::Error::Database(Box::new(StubDbError("23505"))));
        assert!(matches!(err, ApiError::EmailTaken));
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = ApiError::from(sqlx::Error::Database(Box::new(StubDbError("23503"))));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
