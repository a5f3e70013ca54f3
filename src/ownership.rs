use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;

/// Resource-level authorization for mutating paths. An existing resource
/// owned by someone else is a 403, never a 404: the caller learns the thing
/// exists but may not touch it. Read and create paths do not come through
/// here; they scope their queries and inserts to the caller's id directly.
pub fn ensure_owner(resource: &'static str, owner: Uuid, caller: Uuid) -> Result<(), ApiError> {
    if owner == caller {
        Ok(())
    } else {
        warn!(%owner, %caller, resource, "owner mismatch");
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn owner_may_mutate() {
        let id = Uuid::new_v4();
        assert!(ensure_owner("Workout", id, id).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden_not_missing() {
        let err = ensure_owner("Workout", Uuid::new_v4(), Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
